//! History command - list recent readings.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use syntrack_core::{AsciiGrid, NormalizedSeries, Snapshot};
use syntrack_store::Settings;
use tracing::debug;

use super::{NO_DATA_MESSAGE, Session};
use crate::output::UsageChartOutput;
use crate::{Cli, OutputFormat};

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Days of history to show (defaults to the configured window).
    #[arg(long, short)]
    pub days: Option<u32>,

    /// Draw an ASCII usage chart instead of the table.
    #[arg(long, short)]
    pub chart: bool,
}

/// Runs the history command.
pub fn run(args: &HistoryArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let session = Session::open(cli, settings)?;
    let days = args.days.unwrap_or(settings.engine.analytics.history_days);
    let snapshots = session.analytics().recent(Utc::now(), days)?;
    debug!(days, count = snapshots.len(), "Loaded history");

    if args.chart {
        return print_chart(&session, cli, &snapshots);
    }

    match cli.format {
        OutputFormat::Text if snapshots.is_empty() => println!("{NO_DATA_MESSAGE}"),
        OutputFormat::Text => println!("{}", session.text.format_history(&snapshots, days)),
        OutputFormat::Json => println!("{}", session.json.format_history(&snapshots)?),
    }

    Ok(())
}

fn print_chart(session: &Session<'_>, cli: &Cli, snapshots: &[Snapshot]) -> Result<()> {
    let chart = &session.settings.engine.chart;
    let series = match NormalizedSeries::from_snapshots(snapshots) {
        Ok(series) => series,
        Err(e) => {
            match cli.format {
                OutputFormat::Text => println!("Need at least 2 data points for a chart"),
                OutputFormat::Json => {
                    println!(
                        "{}",
                        session.json.format_notice(&e.to_string(), Some(e.available))?
                    );
                }
            }
            return Ok(());
        }
    };

    let grid = AsciiGrid::render(&series, chart.grid_width, chart.grid_height);
    match cli.format {
        OutputFormat::Text => println!(
            "{}",
            session
                .text
                .format_usage_chart(&series, &grid, chart.label_count)
        ),
        OutputFormat::Json => println!(
            "{}",
            session.json.format(&UsageChartOutput {
                series: &series,
                grid: grid.lines(),
            })?
        ),
    }
    Ok(())
}
