// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

//! # Syntrack Core
//!
//! Core types, analytics and chart geometry for Syntrack.
//!
//! This crate is pure: it never touches the disk or the network. Everything
//! here operates on a borrowed slice of [`Snapshot`]s handed over by a
//! [`SnapshotSource`] (the SQLite store in production, a plain slice in tests).
//!
//! ## Key Types
//!
//! ### Models
//! - [`Snapshot`] - One stored quota observation (leftover is derived)
//! - [`QuotaSample`] - Inbound sample from the collector
//! - [`DailyBucket`] / [`WeeklyBucket`] - Derived per-day / per-week views
//! - [`WeekKey`] - ISO 8601 week identifier (`YYYY-Www`)
//!
//! ### Analytics
//! - [`UsageAnalytics`] - Read facade over a [`SnapshotSource`]
//! - [`BurnRate`] - Consumption velocity, with an explicit insufficient state
//! - [`Projection`] - Time until the quota runs out
//!
//! ### Charts
//! - [`NormalizedSeries`] - The shared normalization every renderer consumes
//! - [`AsciiGrid`], [`Sparkline`], [`SvgChart`], [`normalized_bars`]

pub mod analytics;
pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export configuration
pub use config::{
    AnalyticsConfig, BucketZone, ChartConfig, EngineConfig, MAX_BURN_WINDOW_HOURS,
};

// Re-export all model types
pub use models::{
    DailyBucket, QuotaSample, Snapshot, SnapshotId, UsageBucket, WeekKey, WeeklyBucket,
};

// Re-export analytics
pub use analytics::{
    BurnRate, BurnRateReport, CurrentStatus, DaySummary, OverallStats, Projection,
    UsageAnalytics, WeekSummary, burn_rate, daily_buckets, estimated_exhaustion_at,
    time_until_exhaustion, usage_percent, weekly_buckets,
};

// Re-export chart geometry
pub use chart::{
    AsciiGrid, AxisLabel, Bar, ChartPoint, InsufficientData, NormalizedPoint, NormalizedSeries,
    Sparkline, SvgChart, bar_length, normalized_bars,
};

// Re-export traits
pub use traits::SnapshotSource;
