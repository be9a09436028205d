//! Burn rate estimation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Snapshot;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Requests consumed per hour over a trailing window.
///
/// `Insufficient` is a normal outcome (fewer than two snapshots in the window,
/// or no time elapsed between them). It reads as a zero rate through
/// [`BurnRate::per_hour`], but callers that care can tell it apart from a
/// measured zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BurnRate {
    /// Not enough data to measure a rate.
    Insufficient {
        /// Snapshots found in the window.
        samples: usize,
    },
    /// A measured rate between the first and last snapshot in the window.
    Measured {
        /// Requests per hour. Negative after a counter reset.
        per_hour: f64,
        /// Snapshots found in the window.
        samples: usize,
        /// Hours between the first and last snapshot.
        elapsed_hours: f64,
    },
}

impl BurnRate {
    /// Requests per hour; `0.0` when the rate could not be measured.
    pub fn per_hour(&self) -> f64 {
        match self {
            Self::Insufficient { .. } => 0.0,
            Self::Measured { per_hour, .. } => *per_hour,
        }
    }

    /// Requests per day at the current hourly rate.
    pub fn per_day(&self) -> f64 {
        self.per_hour() * 24.0
    }

    /// Snapshots that fell inside the window.
    pub fn samples(&self) -> usize {
        match self {
            Self::Insufficient { samples } | Self::Measured { samples, .. } => *samples,
        }
    }

    /// Returns true if the rate could not be measured.
    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::Insufficient { .. })
    }
}

/// Computes the burn rate from snapshots collected at or after `window_start`.
///
/// Uses the first and last snapshot inside the window:
/// `(last.used - first.used) / hours_between(first, last)`.
pub fn burn_rate(snapshots: &[Snapshot], window_start: DateTime<Utc>) -> BurnRate {
    let mut in_window: Vec<&Snapshot> = snapshots
        .iter()
        .filter(|s| s.collected_at >= window_start)
        .collect();
    in_window.sort_by_key(|s| (s.collected_at, s.id));

    let samples = in_window.len();
    let (Some(first), Some(last)) = (in_window.first(), in_window.last()) else {
        return BurnRate::Insufficient { samples };
    };
    if samples < 2 {
        return BurnRate::Insufficient { samples };
    }

    let elapsed_hours =
        (last.collected_at - first.collected_at).num_milliseconds() as f64 / MILLIS_PER_HOUR;
    if elapsed_hours <= 0.0 {
        return BurnRate::Insufficient { samples };
    }

    let delta = last.requests_used.saturating_sub(first.requests_used);
    BurnRate::Measured {
        per_hour: delta as f64 / elapsed_hours,
        samples,
        elapsed_hours,
    }
}

// ============================================================================
// Tests
// ============================================================================
