//! Data models for the spending dashboard.
//!
//! This module contains the core data structures shared between the
//! loader, the analysis passes, the advisor and the report generator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single parsed expense row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the transaction.
    pub date: NaiveDate,
    /// Spending category, taken verbatim (may be empty).
    pub category: String,
    /// Signed amount; positive means money spent.
    pub amount: f64,
}

impl Transaction {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
        }
    }

    /// `YYYY-MM` label of the month this transaction falls in.
    pub fn month_label(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Aggregate statistics derived from a record table.
///
/// Recomputed on demand, never cached. Statistics that are undefined for an
/// empty table are `None`; sums and means fall back to `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    /// Number of records the snapshot was computed from.
    pub record_count: usize,
    /// Sum of all amounts.
    pub total: f64,
    /// Category -> summed amount.
    pub category_totals: BTreeMap<String, f64>,
    /// `YYYY-MM` -> summed amount.
    pub month_totals: BTreeMap<String, f64>,
    /// Date -> summed amount.
    pub date_totals: BTreeMap<NaiveDate, f64>,
    /// Most frequent category; ties go to the first one seen in the table.
    pub mode_category: Option<String>,
    /// Date with the highest summed spend; ties go to the earliest date.
    pub day_of_highest_spend: Option<NaiveDate>,
    /// Mean of the per-date totals.
    pub avg_spend_per_day: f64,
    /// Largest single amount.
    pub max_single_amount: Option<f64>,
    /// Mean of the raw amounts.
    pub mean_amount: f64,
    /// Number of distinct categories.
    pub distinct_category_count: usize,
}

impl AggregateSnapshot {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// One `{key, value}` pair of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub key: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// The three presentation-ready series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// One point per category, in first-seen order.
    pub by_category: Vec<ChartPoint>,
    /// One point per date, ascending.
    pub by_date: Vec<ChartPoint>,
    /// One point per `YYYY-MM` month, ascending.
    pub by_month: Vec<ChartPoint>,
}

/// Which rule produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightRule {
    /// Spending in the watched category crossed its threshold.
    CategoryOverspend,
    /// A single transaction was unusually large.
    LargeTransaction,
    /// Spending sits in only a few categories.
    Concentration,
    /// The average transaction is small.
    LowAverage,
}

impl fmt::Display for InsightRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightRule::CategoryOverspend => write!(f, "Category overspend"),
            InsightRule::LargeTransaction => write!(f, "Large transaction"),
            InsightRule::Concentration => write!(f, "Concentration"),
            InsightRule::LowAverage => write!(f, "Low average"),
        }
    }
}

/// A rule-triggered observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub rule: InsightRule,
    pub message: String,
}

/// A question put to the advisor and what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorExchange {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metadata about the rendered dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// File the records were loaded from.
    pub source: String,
    /// When the dashboard was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records loaded.
    pub record_count: usize,
}

/// Everything the presentation layer renders for one loaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    /// First few records, for the data preview.
    pub preview: Vec<Transaction>,
    pub snapshot: AggregateSnapshot,
    pub charts: ChartData,
    pub insights: Vec<Insight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor: Option<AdvisorExchange>,
}
