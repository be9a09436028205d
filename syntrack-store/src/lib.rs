// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Syntrack Store
//!
//! Persistence for Syntrack.
//!
//! This crate provides:
//!
//! - **SnapshotStore**: Append-only SQLite table of quota snapshots
//! - **SettingsStore**: User preferences backed by a JSON file
//! - **Persistence**: Default paths and JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use syntrack_core::{AnalyticsConfig, UsageAnalytics};
//! use syntrack_store::SnapshotStore;
//!
//! let store = SnapshotStore::open(&path)?;
//! store.insert(1000, 240, None)?;
//!
//! let analytics = UsageAnalytics::new(&store, AnalyticsConfig::default());
//! let rate = analytics.burn_rate(24)?;
//! ```

pub mod error;
pub mod persistence;
pub mod settings;
pub mod snapshot_store;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_data_dir, default_database_path, default_settings_path, load_json,
    save_json,
};
pub use settings::{LogLevel, Settings, SettingsStore};
pub use snapshot_store::SnapshotStore;
