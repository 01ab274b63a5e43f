//! The in-memory record table.
//!
//! A table is built once per loaded file and replaced wholesale on the next
//! load; records are never mutated after parsing.

pub mod loader;

pub use loader::load_csv;

use crate::models::Transaction;

/// Ordered transactions plus the `YYYY-MM` month derived for each at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<Transaction>,
    months: Vec<String>,
}

impl RecordTable {
    /// Build a table from parsed records, deriving each record's month label.
    pub fn new(records: Vec<Transaction>) -> Self {
        let months = records.iter().map(Transaction::month_label).collect();
        Self { records, months }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in file order.
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// Records paired with their month label.
    pub fn iter(&self) -> impl Iterator<Item = (&Transaction, &str)> {
        self.records
            .iter()
            .zip(self.months.iter().map(String::as_str))
    }

    /// The first `n` records, for previews.
    pub fn head(&self, n: usize) -> &[Transaction] {
        &self.records[..n.min(self.records.len())]
    }
}
