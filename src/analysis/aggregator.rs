//! Spending aggregation and summary statistics.
//!
//! This module computes the [`AggregateSnapshot`] for a record table in a
//! single pass, plus the grouping helpers the chart builder reuses.

use crate::models::AggregateSnapshot;
use crate::table::RecordTable;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Compute every summary statistic for the table.
///
/// An empty table yields `0.0` sums/means and `None` for statistics that need
/// at least one record.
pub fn summarize(table: &RecordTable) -> AggregateSnapshot {
    let mut snapshot = AggregateSnapshot {
        record_count: table.len(),
        ..Default::default()
    };

    for (txn, month) in table.iter() {
        snapshot.total += txn.amount;
        *snapshot
            .category_totals
            .entry(txn.category.clone())
            .or_insert(0.0) += txn.amount;
        *snapshot
            .month_totals
            .entry(month.to_string())
            .or_insert(0.0) += txn.amount;
        *snapshot.date_totals.entry(txn.date).or_insert(0.0) += txn.amount;

        snapshot.max_single_amount = Some(match snapshot.max_single_amount {
            Some(max) => max.max(txn.amount),
            None => txn.amount,
        });
    }

    snapshot.mode_category = mode_category(table);
    snapshot.day_of_highest_spend = day_of_highest_spend(&snapshot.date_totals);
    snapshot.avg_spend_per_day = mean(snapshot.date_totals.values().copied());
    snapshot.mean_amount = mean(table.records().iter().map(|t| t.amount));
    snapshot.distinct_category_count = snapshot.category_totals.len();

    snapshot
}

/// Sum amounts per category, keeping first-seen order.
pub fn category_totals_ordered(table: &RecordTable) -> Vec<(String, f64)> {
    let mut order: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in table.records() {
        match index.get(txn.category.as_str()) {
            Some(&i) => order[i].1 += txn.amount,
            None => {
                index.insert(txn.category.as_str(), order.len());
                order.push((txn.category.clone(), txn.amount));
            }
        }
    }

    order
}

/// Most frequent category; ties resolve to the category encountered first.
pub fn mode_category(table: &RecordTable) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in table.records() {
        match index.get(txn.category.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(txn.category.as_str(), counts.len());
                counts.push((txn.category.as_str(), 1));
            }
        }
    }

    // Strict comparison keeps the earliest category on ties.
    let mut best: Option<(&str, usize)> = None;
    for (category, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((category, count));
        }
    }

    best.map(|(category, _)| category.to_string())
}

/// Date with the highest total; ties resolve to the earliest date.
pub fn day_of_highest_spend(date_totals: &BTreeMap<NaiveDate, f64>) -> Option<NaiveDate> {
    let mut best: Option<(NaiveDate, f64)> = None;

    // BTreeMap iterates ascending, so a strict comparison keeps the earliest.
    for (&date, &total) in date_totals {
        if best.map_or(true, |(_, t)| total > t) {
            best = Some((date, total));
        }
    }

    best.map(|(date, _)| date)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
