//! Query command - structured JSON for agents and scripts.
//!
//! Always prints pretty JSON, whatever `--format` says.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use syntrack_store::Settings;
use tracing::debug;

use super::Session;
use crate::Cli;
use crate::output::{HistoryEntry, JsonFormatter, QueryOutput};

/// Query kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryKind {
    /// Latest reading, or `null` before the first one.
    Current,
    /// Today's consumption.
    Today,
    /// Yesterday's consumption.
    Yesterday,
    /// This ISO week's consumption.
    Week,
    /// Burn rate and exhaustion projection.
    BurnRate,
    /// Raw snapshots from the last `--days` days.
    History,
    /// The last `--days` daily buckets.
    Daily,
    /// The last `--weeks` weekly buckets.
    Weekly,
}

/// Arguments for the query command.
#[derive(Args)]
pub struct QueryArgs {
    /// What to query.
    #[arg(value_enum)]
    pub kind: QueryKind,

    /// Days for `history` and `daily`.
    #[arg(long, short, default_value_t = 7)]
    pub days: u32,

    /// Weeks for `weekly`.
    #[arg(long, short, default_value_t = 4)]
    pub weeks: usize,
}

/// Runs the query command.
pub fn run(args: &QueryArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let session = Session::open(cli, settings)?;
    let analytics = session.analytics();
    let now = Utc::now();
    debug!(kind = ?args.kind, "Running query");

    let output = match args.kind {
        QueryKind::Current => QueryOutput::Current(analytics.current_status(now)?),
        QueryKind::Today => QueryOutput::Day(analytics.day_summary_relative(now, 0)?),
        QueryKind::Yesterday => QueryOutput::Day(analytics.day_summary_relative(now, -1)?),
        QueryKind::Week => QueryOutput::Week(analytics.week_summary(now)?),
        QueryKind::BurnRate => QueryOutput::BurnRate(analytics.burn_rate_report(now)?),
        QueryKind::History => QueryOutput::History(
            analytics
                .recent(now, args.days)?
                .iter()
                .map(HistoryEntry::from)
                .collect(),
        ),
        QueryKind::Daily => {
            QueryOutput::Daily(analytics.daily_buckets(usize::try_from(args.days)?)?)
        }
        QueryKind::Weekly => QueryOutput::Weekly(analytics.weekly_buckets(args.weeks)?),
    };

    println!("{}", JsonFormatter::new(true).format(&output)?);
    Ok(())
}
