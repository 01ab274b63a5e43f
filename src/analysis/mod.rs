//! Analysis passes over a record table.
//!
//! All functions here are pure: they read the table and return new values.

pub mod aggregator;
pub mod charts;
pub mod insights;

pub use aggregator::summarize;
pub use charts::build_charts;
pub use insights::{derive_insights, InsightRules};
