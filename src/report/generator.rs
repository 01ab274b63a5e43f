//! Dashboard rendering.
//!
//! This module turns a [`Dashboard`] into Markdown (with text bar charts) or
//! JSON. It only formats; every number comes precomputed.

use crate::models::{
    AdvisorExchange, AggregateSnapshot, ChartPoint, Dashboard, DashboardMetadata, Insight,
    Transaction,
};
use anyhow::Result;

const BAR_WIDTH: usize = 30;

/// Generate the complete Markdown dashboard.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str("# 💸 BudgetBuddy – Spending Insights\n\n");
    output.push_str(&generate_metadata_section(&dashboard.metadata));
    output.push_str(&generate_preview_section(&dashboard.preview));
    output.push_str(&generate_metrics_section(&dashboard.snapshot));

    output.push_str("## 📈 Visualizations\n\n");
    output.push_str(&generate_chart_section(
        "Spending Breakdown",
        "Category",
        &dashboard.charts.by_category,
        Some(dashboard.snapshot.total),
    ));
    output.push_str(&generate_chart_section(
        "Spending Over Time",
        "Date",
        &dashboard.charts.by_date,
        None,
    ));
    output.push_str(&generate_chart_section(
        "Monthly Spending Comparison",
        "Month",
        &dashboard.charts.by_month,
        None,
    ));

    output.push_str(&generate_insights_section(&dashboard.insights));

    if let Some(ref exchange) = dashboard.advisor {
        output.push_str(&generate_advisor_section(exchange));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON dashboard.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// Format a monetary value as `$1,234.56` (negative as `-$1,234.56`).
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let rounds_to_zero = whole.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');
    let sign = if value < 0.0 && !rounds_to_zero { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac)
}

/// Escape a value for use inside a Markdown table cell.
fn table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Render an advisor exchange as the text shown to the user.
pub fn format_exchange(exchange: &AdvisorExchange) -> String {
    match (&exchange.answer, &exchange.error) {
        (Some(answer), _) => format!("✅ {}", answer),
        (None, Some(error)) => format!("⚠️  Error: {}", error),
        (None, None) => String::new(),
    }
}

fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Transactions:** {}\n\n", metadata.record_count));

    section
}

fn generate_preview_section(preview: &[Transaction]) -> String {
    let mut section = String::new();

    section.push_str("## Preview of Uploaded Data\n\n");
    if preview.is_empty() {
        section.push_str("*No transactions in this file.*\n\n");
        return section;
    }

    section.push_str("| Date | Category | Amount |\n");
    section.push_str("|:---|:---|---:|\n");
    for txn in preview {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            txn.date.format("%Y-%m-%d"),
            table_cell(&txn.category),
            format_money(txn.amount)
        ));
    }
    section.push('\n');

    section
}

fn generate_metrics_section(snapshot: &AggregateSnapshot) -> String {
    let mut section = String::new();

    let mode = snapshot.mode_category.as_deref().unwrap_or("n/a");
    let day = snapshot
        .day_of_highest_spend
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "n/a".to_string());

    section.push_str("## 📊 Key Metrics\n\n");
    section.push_str("| Total Spent | Most Frequent Category | Day with Highest Spend | Avg Spend/Day |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        format_money(snapshot.total),
        table_cell(mode),
        day,
        format_money(snapshot.avg_spend_per_day)
    ));

    section
}

fn generate_chart_section(
    title: &str,
    key_label: &str,
    points: &[ChartPoint],
    share_of: Option<f64>,
) -> String {
    let mut section = String::new();

    section.push_str(&format!("### {}\n\n", title));
    if points.is_empty() {
        section.push_str("*No data.*\n\n");
        return section;
    }

    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    let with_share = share_of.filter(|total| *total != 0.0);

    match with_share {
        Some(_) => {
            section.push_str(&format!("| {} | Amount | Share | |\n", key_label));
            section.push_str("|:---|---:|---:|:---|\n");
        }
        None => {
            section.push_str(&format!("| {} | Amount | |\n", key_label));
            section.push_str("|:---|---:|:---|\n");
        }
    }

    for point in points {
        let bar = render_bar(point.value, max);
        match with_share {
            Some(total) => section.push_str(&format!(
                "| {} | {} | {:.1}% | `{}` |\n",
                table_cell(&point.key),
                format_money(point.value),
                point.value / total * 100.0,
                bar
            )),
            None => section.push_str(&format!(
                "| {} | {} | `{}` |\n",
                table_cell(&point.key),
                format_money(point.value),
                bar
            )),
        }
    }
    section.push('\n');

    section
}

/// A bar proportional to `value / max`; non-positive values draw nothing.
fn render_bar(value: f64, max: f64) -> String {
    if value <= 0.0 || max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn generate_insights_section(insights: &[Insight]) -> String {
    let mut section = String::new();

    section.push_str("## 🔎 Insights\n\n");
    if insights.is_empty() {
        section.push_str("No notable spending patterns.\n\n");
        return section;
    }

    for insight in insights {
        section.push_str(&format!("- {}\n", insight.message));
    }
    section.push('\n');

    section
}

fn generate_advisor_section(exchange: &AdvisorExchange) -> String {
    let mut section = String::new();

    section.push_str("## 🤖 Ask BudgetBuddy\n\n");
    section.push_str(&format!("**Question:** {}\n\n", exchange.question));
    section.push_str(&format_exchange(exchange));
    section.push_str("\n\n");

    section
}

fn generate_footer() -> String {
    "---\n\n*💡 Tip: run with --interactive to ask several questions.*\n".to_string()
}
