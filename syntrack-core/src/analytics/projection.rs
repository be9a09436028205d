//! Exhaustion projection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Hours until `leftover` reaches zero at `rate_per_hour`.
///
/// Returns `None` when the rate is not positive (or not finite): nothing can
/// be projected. A zero or negative result means the quota is already used up.
pub fn time_until_exhaustion(leftover: i64, rate_per_hour: f64) -> Option<f64> {
    if !rate_per_hour.is_finite() || rate_per_hour <= 0.0 {
        return None;
    }
    Some(leftover as f64 / rate_per_hour)
}

/// Returns `now + hours`.
///
/// Durations that don't fit a timestamp saturate at the representable range.
#[allow(clippy::cast_possible_truncation)]
pub fn estimated_exhaustion_at(now: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    let millis = (hours * MILLIS_PER_HOUR).round();
    if !millis.is_finite() {
        return if millis > 0.0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        };
    }
    let delta = Duration::try_milliseconds(millis as i64).unwrap_or(if millis > 0.0 {
        Duration::MAX
    } else {
        Duration::MIN
    });
    now.checked_add_signed(delta).unwrap_or(if millis > 0.0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// What a caller should show for the quota's future.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Projection {
    /// No positive burn rate; nothing to project.
    Unavailable,
    /// Leftover is already zero or negative.
    Exhausted,
    /// The quota runs out after `hours`, at `at`.
    Remaining {
        /// Hours until exhaustion.
        hours: f64,
        /// Estimated exhaustion time.
        at: DateTime<Utc>,
    },
}

impl Projection {
    /// Projects exhaustion from `leftover` at `rate_per_hour`, relative to `now`.
    pub fn project(leftover: i64, rate_per_hour: f64, now: DateTime<Utc>) -> Self {
        match time_until_exhaustion(leftover, rate_per_hour) {
            None => Self::Unavailable,
            Some(hours) if hours <= 0.0 => Self::Exhausted,
            Some(hours) => Self::Remaining {
                hours,
                at: estimated_exhaustion_at(now, hours),
            },
        }
    }

    /// Hours until exhaustion, if projected.
    pub fn hours(&self) -> Option<f64> {
        match self {
            Self::Remaining { hours, .. } => Some(*hours),
            Self::Exhausted => Some(0.0),
            Self::Unavailable => None,
        }
    }

    /// Days until exhaustion, if projected.
    pub fn days(&self) -> Option<f64> {
        self.hours().map(|h| h / 24.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
