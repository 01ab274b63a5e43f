//! Chart series derivation.
//!
//! Absent periods are not gap-filled; a date or month with no records simply
//! has no point.

use crate::analysis::aggregator::category_totals_ordered;
use crate::models::{ChartData, ChartPoint};
use crate::table::RecordTable;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Build all three series.
pub fn build_charts(table: &RecordTable) -> ChartData {
    ChartData {
        by_category: by_category(table),
        by_date: by_date(table),
        by_month: by_month(table),
    }
}

/// Spending per category, first-seen order.
pub fn by_category(table: &RecordTable) -> Vec<ChartPoint> {
    category_totals_ordered(table)
        .into_iter()
        .map(|(category, total)| ChartPoint::new(category, total))
        .collect()
}

/// Spending per date, ascending.
pub fn by_date(table: &RecordTable) -> Vec<ChartPoint> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for txn in table.records() {
        *totals.entry(txn.date).or_insert(0.0) += txn.amount;
    }

    totals
        .into_iter()
        .map(|(date, total)| ChartPoint::new(date.format("%Y-%m-%d").to_string(), total))
        .collect()
}

/// Spending per `YYYY-MM` month, ascending.
pub fn by_month(table: &RecordTable) -> Vec<ChartPoint> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for (txn, month) in table.iter() {
        *totals.entry(month).or_insert(0.0) += txn.amount;
    }

    totals
        .into_iter()
        .map(|(month, total)| ChartPoint::new(month, total))
        .collect()
}
