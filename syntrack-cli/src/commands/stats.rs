//! Stats command - burn rate, consumption buckets and overall statistics.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use syntrack_core::{NormalizedSeries, Sparkline};
use syntrack_store::Settings;

use super::{NO_DATA_MESSAGE, Session};
use crate::output::{StatsReport, StatsWidths};
use crate::{Cli, OutputFormat};

/// Days of history behind the trend sparkline.
const TREND_DAYS: u32 = 7;

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    /// Show daily/weekly consumption as bars instead of tables.
    #[arg(long, short)]
    pub chart: bool,
}

/// Runs the stats command.
pub fn run(args: &StatsArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let session = Session::open(cli, settings)?;
    let analytics = session.analytics();
    let now = Utc::now();

    let Some(current) = analytics.current_status(now)? else {
        match cli.format {
            OutputFormat::Text => println!("{NO_DATA_MESSAGE}"),
            OutputFormat::Json => {
                println!("{}", session.json.format_notice(NO_DATA_MESSAGE, Some(0))?);
            }
        }
        return Ok(());
    };

    let config = analytics.config();
    let chart = &settings.engine.chart;
    let recent = analytics.recent(now, TREND_DAYS)?;
    let trend = NormalizedSeries::from_snapshots(&recent)
        .ok()
        .map(|series| Sparkline::render(&series, chart.sparkline_width));

    let report = StatsReport {
        current,
        burn_rate: analytics.burn_rate_report(now)?,
        daily: analytics.daily_buckets(config.daily_buckets)?,
        weekly: analytics.weekly_buckets(config.weekly_buckets)?,
        overall: analytics.overall()?,
        trend,
    };

    match cli.format {
        OutputFormat::Text => {
            let widths = StatsWidths {
                meter: chart.meter_width,
                bars: chart.stats_bar_width,
            };
            println!("{}", session.text.format_stats(&report, args.chart, widths));
        }
        OutputFormat::Json => println!("{}", session.json.format(&report)?),
    }

    Ok(())
}
