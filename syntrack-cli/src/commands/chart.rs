//! Chart command - ASCII usage chart or consumption bars.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use std::fmt::Display;
use syntrack_core::{AsciiGrid, NormalizedSeries, UsageBucket, normalized_bars};
use syntrack_store::Settings;

use super::Session;
use crate::output::{BarChartOutput, UsageChartOutput};
use crate::{Cli, OutputFormat};

const NO_BUCKETS_MESSAGE: &str = "No data available.";

/// Chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ChartType {
    /// Used and leftover over time.
    #[default]
    Usage,
    /// Requests consumed per day.
    Daily,
    /// Requests consumed per ISO week.
    Weekly,
}

/// Arguments for the chart command.
#[derive(Args)]
pub struct ChartArgs {
    /// Chart to draw.
    #[arg(long = "type", short = 't', value_enum, default_value_t = ChartType::Usage)]
    pub kind: ChartType,

    /// Days of history for the usage chart, or daily buckets for the daily
    /// chart (defaults to the configured window).
    #[arg(long, short)]
    pub days: Option<u32>,
}

/// Runs the chart command.
pub fn run(args: &ChartArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let session = Session::open(cli, settings)?;
    match args.kind {
        ChartType::Usage => usage_chart(&session, cli, args.days),
        ChartType::Daily => {
            let days = args.days.unwrap_or(settings.engine.analytics.history_days);
            let buckets = session.analytics().daily_buckets(usize::try_from(days)?)?;
            bar_chart(&session, cli, "Daily Requests Consumed", buckets)
        }
        ChartType::Weekly => {
            let buckets = session
                .analytics()
                .weekly_buckets(settings.engine.analytics.chart_weeks)?;
            bar_chart(&session, cli, "Weekly Requests Consumed", buckets)
        }
    }
}

fn usage_chart(session: &Session<'_>, cli: &Cli, days: Option<u32>) -> Result<()> {
    let config = &session.settings.engine;
    let days = days.unwrap_or(config.analytics.history_days);
    let snapshots = session.analytics().recent(Utc::now(), days)?;

    let series = match NormalizedSeries::from_snapshots(&snapshots) {
        Ok(series) => series,
        Err(e) => {
            match cli.format {
                OutputFormat::Text => {
                    println!("Need at least 2 snapshots. Run 'syntrack record' more often.");
                }
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

    let grid = AsciiGrid::render(&series, config.chart.grid_width, config.chart.grid_height);
    match cli.format {
        OutputFormat::Text => println!(
            "{}",
            session
                .text
                .format_usage_chart(&series, &grid, config.chart.label_count)
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

/// Most recent bucket first.
fn bar_chart<K>(
    session: &Session<'_>,
    cli: &Cli,
    title: &str,
    buckets: Vec<UsageBucket<K>>,
) -> Result<()>
where
    K: Display + serde::Serialize,
{
    if buckets.is_empty() {
        match cli.format {
            OutputFormat::Text => println!("{NO_BUCKETS_MESSAGE}"),
            OutputFormat::Json => {
                println!("{}", session.json.format_notice(NO_BUCKETS_MESSAGE, Some(0))?);
            }
        }
        return Ok(());
    }

    let width = session.settings.engine.chart.bar_width;
    let bars = normalized_bars(buckets, width, |b| b.requests_consumed);

    match cli.format {
        OutputFormat::Text => {
            println!("{}\n", session.text.format_bar_chart(title, &bars, width));
        }
        OutputFormat::Json => {
            println!("{}", session.json.format(&BarChartOutput { width, bars: &bars })?);
        }
    }
    Ok(())
}
