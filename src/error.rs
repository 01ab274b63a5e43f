//! Error types for loading expense data and talking to the advisor.

use thiserror::Error;

/// Failures while turning an expense CSV into a [`RecordTable`](crate::table::RecordTable).
///
/// Loading is all-or-nothing: the first bad cell rejects the whole file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed input: missing required column '{missing}'")]
    MalformedInput { missing: String },

    #[error("Row {row}: cannot parse {column} value '{value}'")]
    RowParse {
        row: usize,
        column: String,
        value: String,
    },
}

/// Failures of a single advisor question.
///
/// None of these invalidate the loaded table; the caller may simply ask again.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("No API key configured. Set {env_var} in your environment or a .env file.")]
    MissingCredential { env_var: String },

    #[error("No transactions loaded; there is nothing to ask about yet")]
    EmptyTable,

    #[error("A question is already being answered; wait for it to finish")]
    Busy,

    #[error("{0}")]
    Request(String),
}
