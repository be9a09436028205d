//! CLI command implementations.

pub mod chart;
pub mod config;
pub mod history;
pub mod query;
pub mod record;
pub mod stats;
pub mod status;
pub mod svg;

use anyhow::{Context, Result};
use syntrack_core::UsageAnalytics;
use syntrack_store::{Settings, SnapshotStore};
use tracing::debug;

use crate::Cli;
use crate::output::{JsonFormatter, TextFormatter};

/// Shown by text views before the first snapshot is recorded.
pub const NO_DATA_MESSAGE: &str = "No data collected yet. Run 'syntrack record' first.";

/// An open database plus the formatters selected on the command line.
pub struct Session<'a> {
    pub store: SnapshotStore,
    pub settings: &'a Settings,
    pub text: TextFormatter,
    pub json: JsonFormatter,
}

impl<'a> Session<'a> {
    /// Resolves the database path and opens the store.
    pub fn open(cli: &Cli, settings: &'a Settings) -> Result<Self> {
        let path = settings.resolve_database_path(cli.db.as_deref());
        debug!(path = %path.display(), "Resolved database path");

        let store = SnapshotStore::open(&path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;

        Ok(Self {
            store,
            settings,
            text: TextFormatter::new(!cli.no_color),
            json: JsonFormatter::new(cli.pretty),
        })
    }

    /// Analytics over the opened store.
    pub fn analytics(&self) -> UsageAnalytics<'_, SnapshotStore> {
        UsageAnalytics::new(&self.store, self.settings.engine.analytics.clone())
    }
}
