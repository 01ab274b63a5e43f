//! Prompt construction for advisor questions.
//!
//! Only aggregated sums ever reach the prompt; individual transactions never
//! leave the process.

use crate::models::AggregateSnapshot;

/// System instruction sent with every question.
pub const SYSTEM_PROMPT: &str = "You're a financial advisor analyzing personal expense data. Be friendly and actionable.";

/// Render the category and month totals as the context block.
///
/// Categories are listed by name and months chronologically so the same
/// snapshot always produces the same text.
pub fn build_context(snapshot: &AggregateSnapshot) -> String {
    format!(
        "This is the user's expense summary by category: {}\nAnd by month: {}\n",
        format_totals(snapshot.category_totals.iter().map(|(k, v)| (k.as_str(), *v))),
        format_totals(snapshot.month_totals.iter().map(|(k, v)| (k.as_str(), *v))),
    )
}

/// Full user prompt: context, instructions, then the literal question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "{}Please answer the user's question in a friendly, concise, and actionable way.\nQuestion: {}",
        context, question
    )
}

fn format_totals<'a>(totals: impl Iterator<Item = (&'a str, f64)>) -> String {
    let entries: Vec<String> = totals
        .map(|(key, total)| format!("{}: {:.2}", key, total))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
