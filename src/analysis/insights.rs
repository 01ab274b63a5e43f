//! Rule-based spending observations.
//!
//! Rules run in a fixed order and each emits at most one message, so the
//! output for a given table is always the same.

use crate::models::{AggregateSnapshot, Insight, InsightRule};
use crate::table::RecordTable;
use tracing::debug;

/// Thresholds the insight rules compare against.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRules {
    /// Category watched by the overspend rule.
    pub food_category: String,
    /// Overspend fires when that category's total is above this.
    pub food_threshold: f64,
    /// Large-transaction fires when the biggest amount is above this.
    pub large_transaction_threshold: f64,
    /// Concentration fires when there are fewer distinct categories than this.
    pub concentration_min_categories: usize,
    /// Low-average fires when the mean amount is below this.
    pub low_average_threshold: f64,
}

impl Default for InsightRules {
    fn default() -> Self {
        Self {
            food_category: "Food".to_string(),
            food_threshold: 200.0,
            large_transaction_threshold: 100.0,
            concentration_min_categories: 3,
            low_average_threshold: 20.0,
        }
    }
}

impl From<&crate::config::InsightsConfig> for InsightRules {
    fn from(config: &crate::config::InsightsConfig) -> Self {
        Self {
            food_category: config.food_category.clone(),
            food_threshold: config.food_threshold,
            large_transaction_threshold: config.large_transaction_threshold,
            concentration_min_categories: config.concentration_min_categories,
            low_average_threshold: config.low_average_threshold,
        }
    }
}

/// Evaluate every rule against the table and its snapshot.
///
/// An empty table produces no insights.
pub fn derive_insights(
    table: &RecordTable,
    snapshot: &AggregateSnapshot,
    rules: &InsightRules,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if table.is_empty() {
        return insights;
    }

    let food_total = snapshot
        .category_totals
        .get(&rules.food_category)
        .copied()
        .unwrap_or(0.0);
    if food_total > rules.food_threshold {
        insights.push(Insight {
            rule: InsightRule::CategoryOverspend,
            message: format!(
                "🍔 You spent ${:.2} on {}. Consider cooking more often!",
                food_total, rules.food_category
            ),
        });
    }

    if snapshot
        .max_single_amount
        .is_some_and(|max| max > rules.large_transaction_threshold)
    {
        insights.push(Insight {
            rule: InsightRule::LargeTransaction,
            message: "💸 Big spender alert! You had a high single transaction.".to_string(),
        });
    }

    if snapshot.distinct_category_count < rules.concentration_min_categories {
        insights.push(Insight {
            rule: InsightRule::Concentration,
            message: "🧐 Most of your spending is concentrated in a few categories.".to_string(),
        });
    }

    if snapshot.mean_amount < rules.low_average_threshold {
        insights.push(Insight {
            rule: InsightRule::LowAverage,
            message: "👏 Great job keeping your average transaction low!".to_string(),
        });
    }

    debug!("{} insight rules fired", insights.len());
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summarize;
    use crate::models::Transaction;
    use chrono::NaiveDate;

    fn table(rows: &[(&str, &str, f64)]) -> RecordTable {
        RecordTable::new(
            rows.iter()
                .map(|&(d, c, a)| {
                    Transaction::new(NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(), c, a)
                })
                .collect(),
        )
    }

    fn run(t: &RecordTable, rules: &InsightRules) -> Vec<Insight> {
        derive_insights(t, &summarize(t), rules)
    }

    fn rules_fired(insights: &[Insight]) -> Vec<InsightRule> {
        insights.iter().map(|i| i.rule).collect()
    }

    #[test]
    fn test_food_caution_with_exact_total() {
        let t = table(&[("2024-01-01", "Food", 250.0)]);
        let insights = run(&t, &InsightRules::default());

        assert_eq!(insights[0].rule, InsightRule::CategoryOverspend);
        assert!(insights[0].message.contains("$250.00"));
        assert_eq!(
            rules_fired(&insights),
            vec![
                InsightRule::CategoryOverspend,
                InsightRule::LargeTransaction,
                InsightRule::Concentration,
            ]
        );
    }

    #[test]
    fn test_small_coffee_purchases() {
        let t = table(&[
            ("2024-01-01", "Coffee", 5.0),
            ("2024-01-02", "Coffee", 5.0),
            ("2024-01-03", "Coffee", 5.0),
        ]);
        let snapshot = summarize(&t);
        assert_eq!(snapshot.mean_amount, 5.0);

        let insights = derive_insights(&t, &snapshot, &InsightRules::default());
        assert_eq!(
            rules_fired(&insights),
            vec![InsightRule::Concentration, InsightRule::LowAverage]
        );
    }

    #[test]
    fn test_empty_table_fires_nothing() {
        assert!(run(&RecordTable::default(), &InsightRules::default()).is_empty());
    }

    #[test]
    fn test_thresholds_are_strict() {
        let t = table(&[
            ("2024-01-01", "Food", 100.0),
            ("2024-01-02", "Food", 100.0),
            ("2024-01-03", "Rent", 20.0),
            ("2024-01-04", "Fun", 20.0),
        ]);
        // Food == 200, max == 100, three categories, mean == 60.
        assert!(run(&t, &InsightRules::default()).is_empty());
    }

    #[test]
    fn test_overridden_thresholds() {
        let rules = InsightRules {
            food_category: "Dining".to_string(),
            food_threshold: 10.0,
            large_transaction_threshold: 1000.0,
            concentration_min_categories: 1,
            low_average_threshold: 0.0,
        };
        let t = table(&[("2024-01-01", "Dining", 12.0)]);
        let insights = run(&t, &rules);

        assert_eq!(rules_fired(&insights), vec![InsightRule::CategoryOverspend]);
        assert!(insights[0].message.contains("$12.00 on Dining"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let t = table(&[
            ("2024-01-01", "Food", 300.0),
            ("2024-01-02", "Coffee", 3.0),
        ]);
        let rules = InsightRules::default();
        assert_eq!(run(&t, &rules), run(&t, &rules));
    }
}
