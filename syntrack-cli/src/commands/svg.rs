//! Svg command - render the usage chart as standalone SVG markup.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use syntrack_core::{NormalizedSeries, SvgChart};
use syntrack_store::Settings;
use tracing::{debug, info};

use super::Session;
use crate::output::WrittenOutput;
use crate::{Cli, OutputFormat};

/// Drawn instead of the chart when there are fewer than two points.
const PLACEHOLDER_MESSAGE: &str = "No data available";

/// Arguments for the svg command.
#[derive(Args)]
pub struct SvgArgs {
    /// Days of history to plot (defaults to the configured window).
    #[arg(long, short)]
    pub days: Option<u32>,

    /// Write the markup to a file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Runs the svg command.
pub async fn run(args: &SvgArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let session = Session::open(cli, settings)?;
    let days = args.days.unwrap_or(settings.engine.analytics.history_days);
    let snapshots = session.analytics().recent(Utc::now(), days)?;
    let chart_config = &settings.engine.chart;

    let markup = match NormalizedSeries::from_snapshots(&snapshots) {
        Ok(series) => SvgChart::map(&series, chart_config).to_markup(),
        Err(e) => {
            debug!(available = e.available, "Too few snapshots, drawing placeholder");
            SvgChart::placeholder(chart_config, PLACEHOLDER_MESSAGE)
        }
    };

    let Some(path) = &args.output else {
        println!("{markup}");
        return Ok(());
    };

    tokio::fs::write(path, &markup)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = markup.len(), "Wrote SVG chart");

    match cli.format {
        OutputFormat::Text => println!("Wrote {} ({} bytes)", path.display(), markup.len()),
        OutputFormat::Json => println!(
            "{}",
            session.json.format(&WrittenOutput {
                path: path.display().to_string(),
                bytes: markup.len(),
            })?
        ),
    }
    Ok(())
}
