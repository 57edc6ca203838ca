//! log-ingest: import a transfer log CSV into SQLite and optionally
//! answer the fixed analytics questions.
//!
//! Usage:
//!   log-ingest --input server_log.csv --db log_parser.db
//!   log-ingest --skipdupes --analyze
//!   log-ingest --config ingest.json --json

use anyhow::{Context, Result};
use clap::Parser;
use transfer_log_core::{
    analytics::{
        self, AnalyticsReport, LARGE_TRANSFER_THRESHOLD_KB, POINT_QUESTION_DATE,
        POINT_QUESTION_USER,
    },
    config::IngestConfig,
    ingest::{self, DuplicatePolicy, IngestSummary},
    store::EventStore,
};

#[derive(Parser)]
#[command(name = "log-ingest", version, about = "Import transfer events into SQLite")]
struct Cli {
    /// Skip rows already imported instead of failing on them.
    #[arg(long)]
    skipdupes: bool,

    /// Answer the fixed analytics questions after import.
    #[arg(long)]
    analyze: bool,

    /// SQLite database path.
    #[arg(long, env = "LOG_INGEST_DB")]
    db: Option<String>,

    /// Input CSV path.
    #[arg(long, env = "LOG_INGEST_INPUT")]
    input: Option<String>,

    /// JSON config file; flags override its values.
    #[arg(long)]
    config: Option<String>,

    /// Print the summary (and report) as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct RunOutput {
    summary: IngestSummary,
    stored: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    analytics: Option<AnalyticsReport>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    let store = EventStore::open(&config.db_path)
        .with_context(|| format!("unable to open database {}", config.db_path))?;
    store.ensure_schema().context("unable to migrate database")?;

    let summary = ingest::ingest_file(&store, &config.input_path, config.duplicate_policy)?;
    log::info!("Success!");
    let stored = store.event_count()?;

    let report = if config.analyze {
        log::info!("Analyzing data...");
        Some(analytics::analyze(&store)?)
    } else {
        None
    };

    if cli.json {
        let output = RunOutput {
            summary,
            stored,
            analytics: report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", format_summary(&summary, stored));
        if let Some(report) = report {
            print_report(&report);
        }
    }

    Ok(())
}

fn effective_config(cli: &Cli) -> Result<IngestConfig> {
    let mut config = match &cli.config {
        Some(path) => IngestConfig::load(path)?,
        None => IngestConfig::default(),
    };

    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(input) = &cli.input {
        config.input_path = input.clone();
    }
    if cli.skipdupes {
        config.duplicate_policy = DuplicatePolicy::SkipDuplicates;
    }
    if cli.analyze {
        config.analyze = true;
    }
    Ok(config)
}

fn format_summary(summary: &IngestSummary, stored: u64) -> String {
    format!(
        "Imported {} new events from {} lines ({} duplicates skipped); {} events stored",
        summary.inserted, summary.lines_read, summary.duplicates_skipped, stored
    )
}

fn print_report(report: &AnalyticsReport) {
    println!("How many users accessed the server?: {}", report.unique_users);
    println!(
        "How many uploads were larger than {LARGE_TRANSFER_THRESHOLD_KB}kB?: {}",
        report.large_uploads
    );
    println!(
        "How many times did {POINT_QUESTION_USER} transfer on {POINT_QUESTION_DATE}?: {}",
        report.user_transfers_on_date
    );
}
