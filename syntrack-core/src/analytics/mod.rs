//! Usage analytics.
//!
//! Pure functions over a snapshot slice, plus [`UsageAnalytics`], which
//! reads a [`SnapshotSource`](crate::SnapshotSource) and feeds them.
//!
//! ## Submodules
//!
//! - [`aggregate`] - Daily and weekly buckets
//! - [`burn`] - Burn rate over a trailing window
//! - [`projection`] - Time until exhaustion
//! - [`reports`] - Status, day, week, burn-rate and overall summaries
//! - [`engine`] - The read facade

pub mod aggregate;
pub mod burn;
pub mod engine;
pub mod projection;
pub mod reports;

pub use aggregate::{daily_buckets, weekly_buckets};
pub use burn::{BurnRate, burn_rate};
pub use engine::UsageAnalytics;
pub use projection::{Projection, estimated_exhaustion_at, time_until_exhaustion};
pub use reports::{BurnRateReport, CurrentStatus, DaySummary, OverallStats, WeekSummary};

/// Returns `used / limit` as a percentage, or `None` when the limit is zero.
pub fn usage_percent(used: i64, limit: i64) -> Option<f64> {
    if limit == 0 {
        return None;
    }
    Some(used as f64 / limit as f64 * 100.0)
}
