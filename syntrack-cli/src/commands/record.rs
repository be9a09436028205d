//! Record command - store one quota reading.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use syntrack_core::QuotaSample;
use syntrack_store::Settings;
use tracing::{info, warn};

use super::Session;
use crate::{Cli, OutputFormat};

/// Arguments for the record command.
#[derive(Args)]
pub struct RecordArgs {
    /// Subscription limit for the current period.
    #[arg(long)]
    pub limit: i64,

    /// Requests used so far in the current period.
    #[arg(long)]
    pub used: i64,

    /// When the quota renews (RFC 3339).
    #[arg(long, value_name = "TIME")]
    pub renews_at: Option<DateTime<Utc>>,

    /// Observation time (RFC 3339); defaults to now.
    #[arg(long, value_name = "TIME")]
    pub at: Option<DateTime<Utc>>,
}

impl RecordArgs {
    fn to_sample(&self) -> QuotaSample {
        let mut sample = QuotaSample::new(self.limit, self.used);
        if let Some(renews_at) = self.renews_at {
            sample = sample.renewing_at(renews_at);
        }
        if let Some(at) = self.at {
            sample = sample.observed_at(at);
        }
        sample
    }
}

/// Runs the record command.
pub fn run(args: &RecordArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    if args.limit < 0 || args.used < 0 {
        bail!("limit and used must not be negative");
    }
    if args.used > args.limit {
        warn!(used = args.used, limit = args.limit, "Usage exceeds the subscription limit");
    }

    let session = Session::open(cli, settings)?;
    let snapshot = session.store.insert_sample(&args.to_sample())?;
    info!(id = snapshot.id.0, "Recorded snapshot");

    match cli.format {
        OutputFormat::Text => println!("{}", session.text.format_recorded(&snapshot)),
        OutputFormat::Json => println!("{}", session.json.format(&snapshot)?),
    }

    Ok(())
}
