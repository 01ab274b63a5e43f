//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.budgetbuddy.toml` files. The API credential never lives here; only the
//! name of the environment variable it is read from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = ".budgetbuddy.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Insight rule thresholds.
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Advisor (language model) settings.
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of records shown in the data preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            verbose: false,
        }
    }
}

fn default_preview_rows() -> usize {
    5
}

/// Thresholds for the insight rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Category watched by the overspend rule.
    #[serde(default = "default_food_category")]
    pub food_category: String,

    #[serde(default = "default_food_threshold")]
    pub food_threshold: f64,

    #[serde(default = "default_large_transaction_threshold")]
    pub large_transaction_threshold: f64,

    #[serde(default = "default_concentration_min_categories")]
    pub concentration_min_categories: usize,

    #[serde(default = "default_low_average_threshold")]
    pub low_average_threshold: f64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            food_category: default_food_category(),
            food_threshold: default_food_threshold(),
            large_transaction_threshold: default_large_transaction_threshold(),
            concentration_min_categories: default_concentration_min_categories(),
            low_average_threshold: default_low_average_threshold(),
        }
    }
}

fn default_food_category() -> String {
    "Food".to_string()
}

fn default_food_threshold() -> f64 {
    200.0
}

fn default_large_transaction_threshold() -> f64 {
    100.0
}

fn default_concentration_min_categories() -> usize {
    3
}

fn default_low_average_threshold() -> f64 {
    20.0
}

/// Advisor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Base URL of the chat-completions API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Sampling temperature; the service default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Request timeout in seconds; the HTTP client default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: None,
            timeout_seconds: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_optional(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load `path` if it exists; a file that exists but fails to parse is an error.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Ok(Some(Self::load(path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref model) = args.model {
            self.advisor.model = model.clone();
        }
        if let Some(ref api_url) = args.api_url {
            self.advisor.api_url = api_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.advisor.timeout_seconds = Some(timeout);
        }
        if let Some(rows) = args.preview_rows {
            self.general.preview_rows = rows;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.preview_rows, 5);
        assert_eq!(config.insights.food_category, "Food");
        assert_eq!(config.insights.food_threshold, 200.0);
        assert_eq!(config.insights.large_transaction_threshold, 100.0);
        assert_eq!(config.insights.concentration_min_categories, 3);
        assert_eq!(config.insights.low_average_threshold, 20.0);
        assert_eq!(config.advisor.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
preview_rows = 10

[insights]
food_category = "Groceries"
food_threshold = 350.5

[advisor]
model = "gpt-4o-mini"
temperature = 0.2
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.preview_rows, 10);
        assert_eq!(config.insights.food_category, "Groceries");
        assert_eq!(config.insights.food_threshold, 350.5);
        // Unspecified fields keep their defaults.
        assert_eq!(config.insights.low_average_threshold, 20.0);
        assert_eq!(config.advisor.model, "gpt-4o-mini");
        assert_eq!(config.advisor.temperature, Some(0.2));
        assert_eq!(config.advisor.api_url, "https://api.openai.com");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[insights]\nlarge_transaction_threshold = 75.0\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.insights.large_transaction_threshold, 75.0);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[insights\nfood_threshold = ").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_load_optional_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        assert!(Config::load_optional(&path).unwrap().is_none());

        std::fs::write(&path, "[general]\npreview_rows = \"many\"\n").unwrap();
        assert!(Config::load_optional(&path).is_err());
    }

    #[test]
    fn test_verbose_from_file_survives_merge() {
        let mut config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        let args = Args::parse_from(["budgetbuddy", "--file", "x.csv"]);
        config.merge_with_args(&args);

        assert!(config.general.verbose);
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);
        assert_eq!(
            Args::parse_from(["budgetbuddy", "--file", "x.csv", "-q"]).log_level(config.general.verbose),
            tracing::Level::ERROR
        );
    }

    #[test]
    fn test_merge_with_args_only_overrides_given_flags() {
        let mut config = Config::default();
        config.advisor.model = "from-file".to_string();

        let args = Args::parse_from(["budgetbuddy", "--file", "x.csv", "--preview-rows", "3"]);
        config.merge_with_args(&args);

        assert_eq!(config.advisor.model, "from-file");
        assert_eq!(config.general.preview_rows, 3);

        let args = Args::parse_from(["budgetbuddy", "--file", "x.csv", "--model", "gpt-4o"]);
        config.merge_with_args(&args);
        assert_eq!(config.advisor.model, "gpt-4o");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[insights]"));
        assert!(toml_str.contains("[advisor]"));
        assert!(!toml_str.contains("sk-"));
    }
}
