//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// BudgetBuddy - spending insights for your expense CSV
///
/// Summarizes an expense file (columns Date, Category, Amount), draws
/// text charts, flags notable patterns and answers questions about your
/// spending with an AI advisor.
///
/// Examples:
///   budgetbuddy --file expenses.csv
///   budgetbuddy --file expenses.csv --ask "Where can I cut back?"
///   budgetbuddy --file expenses.csv --interactive
///   budgetbuddy --file expenses.csv --format json --output dashboard.json
///   budgetbuddy --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Expense CSV file to analyze
    ///
    /// Must have a header row with the columns Date, Category and Amount.
    #[arg(short, long, value_name = "CSV", required_unless_present = "init_config")]
    pub file: Option<PathBuf>,

    /// Ask the advisor one question about your spending
    #[arg(short, long, value_name = "QUESTION")]
    pub ask: Option<String>,

    /// Read advisor questions from stdin, one per line, after the dashboard
    #[arg(short, long)]
    pub interactive: bool,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the dashboard to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .budgetbuddy.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chat model used by the advisor
    #[arg(short, long, env = "BUDGETBUDDY_MODEL")]
    pub model: Option<String>,

    /// Base URL of the chat-completions API
    #[arg(long, value_name = "URL", env = "BUDGETBUDDY_API_URL")]
    pub api_url: Option<String>,

    /// Advisor request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of records shown in the data preview
    #[arg(long, value_name = "ROWS")]
    pub preview_rows: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .budgetbuddy.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref file) = self.file {
            if !file.is_file() {
                return Err(format!("Expense file does not exist: {}", file.display()));
            }
        }

        if let Some(ref question) = self.ask {
            if question.trim().is_empty() {
                return Err("Question must not be empty".to_string());
            }
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_default` comes from the config file; `--quiet` overrides it.
    pub fn log_level(&self, verbose_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
