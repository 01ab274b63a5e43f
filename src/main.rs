//! BudgetBuddy - AI-powered spending insights
//!
//! A CLI tool that loads an expense CSV, summarizes it, draws text charts,
//! derives rule-based insights and answers questions through a
//! chat-completion model that only ever sees aggregated totals.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable or malformed file, config)

mod advisor;
mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod table;

use advisor::{credential_from_env, Advisor, AdvisorSettings, ChatTransport, OpenAiClient};
use analysis::InsightRules;
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use models::{AdvisorExchange, AggregateSnapshot, Dashboard, DashboardMetadata};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so `[general] verbose` can set the level.
    let config = match load_config(&args) {
        Ok(mut config) => {
            config.merge_with_args(&args);
            config
        }
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, config.general.verbose);

    info!("BudgetBuddy v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    // The credential may come from a .env file next to the data.
    if dotenvy::dotenv().is_ok() {
        debug!("Loaded environment from .env");
    }

    if let Err(e) = run(args, config).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .budgetbuddy.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize insight thresholds and the advisor model.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, verbose_default: bool) {
    let level = args.log_level(verbose_default);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load, analyze, render, then answer any questions.
async fn run(args: Args, config: Config) -> Result<()> {
    let file = args
        .file
        .as_deref()
        .context("No expense file given (use --file)")?;

    let table = table::load_csv(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    info!("Loaded {} transactions", table.len());

    let snapshot = analysis::summarize(&table);
    let charts = analysis::build_charts(&table);
    let rules = InsightRules::from(&config.insights);
    let insights = analysis::derive_insights(&table, &snapshot, &rules);

    let advisor = if args.ask.is_some() || args.interactive {
        Some(build_advisor(&config)?)
    } else {
        None
    };

    let exchange = match (&advisor, &args.ask) {
        (Some(advisor), Some(question)) => {
            Some(ask_advisor(advisor, question, &snapshot, args.quiet).await)
        }
        _ => None,
    };

    let dashboard = Dashboard {
        metadata: DashboardMetadata {
            source: file.display().to_string(),
            generated_at: Utc::now(),
            record_count: table.len(),
        },
        preview: table.head(config.general.preview_rows).to_vec(),
        snapshot,
        charts,
        insights,
        advisor: exchange,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            println!("✅ Dashboard saved to: {}", path.display());
        }
        None => println!("{}", output),
    }

    if let (Some(advisor), true) = (&advisor, args.interactive) {
        run_interactive(advisor, &dashboard.snapshot, args.quiet).await?;
    }

    Ok(())
}

/// Build the advisor from config and the environment credential.
fn build_advisor(config: &Config) -> Result<Advisor<OpenAiClient>> {
    let settings = AdvisorSettings::from(&config.advisor);
    let timeout = config.advisor.timeout_seconds.map(Duration::from_secs);
    let client = OpenAiClient::new(&config.advisor.api_url, timeout)?;

    let api_key = credential_from_env(&settings.api_key_env);
    if api_key.is_none() {
        warn!(
            "{} is not set; advisor questions will not be sent",
            settings.api_key_env
        );
    }

    Ok(Advisor::new(client, settings, api_key))
}

/// Ask one question, showing a spinner while it is outstanding.
async fn ask_advisor<T: ChatTransport>(
    advisor: &Advisor<T>,
    question: &str,
    snapshot: &AggregateSnapshot,
    quiet: bool,
) -> AdvisorExchange {
    let spinner = (!quiet && advisor.has_credential()).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Asking BudgetBuddy...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = advisor.ask(question, snapshot).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(answer) => AdvisorExchange {
            question: question.to_string(),
            answer: Some(answer),
            error: None,
        },
        Err(e) => AdvisorExchange {
            question: question.to_string(),
            answer: None,
            error: Some(e.to_string()),
        },
    }
}

const QUESTION_PROMPT: &str = "\n❓ ";

/// Read questions from stdin until EOF, a blank line, `exit` or `quit`.
async fn run_interactive<T: ChatTransport>(
    advisor: &Advisor<T>,
    snapshot: &AggregateSnapshot,
    quiet: bool,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("🤖 Ask BudgetBuddy a question about your spending (blank line to finish).");

    loop {
        stdout.write_all(QUESTION_PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read question")? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() || question == "exit" || question == "quit" {
            break;
        }

        // Each question is awaited before the next is read.
        let exchange = ask_advisor(advisor, question, snapshot, quiet).await;
        println!("{}", report::format_exchange(&exchange));
    }

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is installed, so it reports nothing itself; a config
/// file that exists but cannot be parsed is an error either way.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    Ok(Config::load_default()?.unwrap_or_default())
}
