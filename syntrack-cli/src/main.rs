// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Syntrack CLI - quota snapshots, analytics and charts from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Record a reading
//! syntrack record --limit 1000 --used 250
//!
//! # Current status and statistics
//! syntrack status
//! syntrack stats --chart
//!
//! # Charts
//! syntrack chart --type daily
//! syntrack svg --days 14 --output usage.svg
//!
//! # JSON for scripts
//! syntrack query burn-rate
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use syntrack_store::{LogLevel, SettingsStore};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{chart, config, history, query, record, stats, status, svg};

// ============================================================================
// CLI Definition
// ============================================================================

/// Syntrack CLI - quota usage tracking.
#[derive(Parser)]
#[command(name = "syntrack")]
#[command(about = "Quota usage snapshots, analytics and charts")]
#[command(long_about = r"
Syntrack records quota snapshots (limit, used, renewal time) in a local
SQLite database and derives consumption, burn rate and projections from them.

Examples:
  syntrack record --limit 1000 --used 250   # Store a reading
  syntrack status                           # Latest reading
  syntrack stats --chart                    # Daily/weekly breakdown
  syntrack chart --type usage               # ASCII usage chart
  syntrack query today                      # JSON for scripts
")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file (overrides SYNTRACK_DB_PATH, DATABASE_PATH and settings).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging, no error message).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Store one quota reading.
    #[command(visible_alias = "r")]
    Record(record::RecordArgs),

    /// Show the latest reading.
    #[command(visible_alias = "s")]
    Status,

    /// List recent readings.
    #[command(visible_alias = "h")]
    History(history::HistoryArgs),

    /// Burn rate, daily/weekly consumption and overall statistics.
    Stats(stats::StatsArgs),

    /// ASCII usage chart or consumption bars.
    #[command(visible_alias = "c")]
    Chart(chart::ChartArgs),

    /// Render the usage chart as SVG.
    Svg(svg::SvgArgs),

    /// JSON queries for scripts.
    #[command(visible_alias = "q")]
    Query(query::QueryArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("syntrack=debug,info")
        } else {
            EnvFilter::new(format!("syntrack={level}"))
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_store = match SettingsStore::load_default().await {
        Ok(store) => store,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: failed to load settings: {e}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    };
    let settings = settings_store.get().await;

    setup_logging(cli.verbose, cli.quiet, settings.log_level);

    let result = match &cli.command {
        Commands::Record(args) => record::run(args, &cli, &settings),
        Commands::Status => status::run(&cli, &settings),
        Commands::History(args) => history::run(args, &cli, &settings),
        Commands::Stats(args) => stats::run(args, &cli, &settings),
        Commands::Chart(args) => chart::run(args, &cli, &settings),
        Commands::Svg(args) => svg::run(args, &cli, &settings).await,
        Commands::Query(args) => query::run(args, &cli, &settings),
        Commands::Config(args) => config::run(args, &cli, &settings_store).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}
