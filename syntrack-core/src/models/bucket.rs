//! Derived bucket types.
//!
//! Buckets are never stored. They are computed from the snapshot rows on
//! every query, so they can't drift from their source.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Week Key
// ============================================================================

/// ISO 8601 week: Monday start, ISO week-numbering year.
///
/// Displayed as `YYYY-Www`, e.g. `2025-W01`. A Monday-to-Sunday week that
/// straddles New Year keeps a single key (the ISO year can differ from the
/// calendar year of some of its days).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    monday: NaiveDate,
}

impl WeekKey {
    /// Returns the week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        Self {
            monday: date - Duration::days(offset),
        }
    }

    /// First day (Monday) of the week.
    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Day after the last day of the week (the next Monday).
    pub fn end(&self) -> NaiveDate {
        self.monday + Duration::days(7)
    }

    /// ISO week-numbering year.
    pub fn year(&self) -> i32 {
        self.monday.iso_week().year()
    }

    /// ISO week number (1-53).
    pub fn week(&self) -> u32 {
        self.monday.iso_week().week()
    }

    /// Returns true if `date` falls inside this week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date < self.end()
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year(), self.week())
    }
}

impl FromStr for WeekKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidData(format!("invalid week key: {s}"));
        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .map(|monday| Self { monday })
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

// ============================================================================
// Usage Bucket
// ============================================================================

/// Aggregated view of the snapshots sharing one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageBucket<K> {
    /// Bucket key (a date or a week).
    pub key: K,
    /// Requests consumed during the bucket; never negative.
    pub requests_consumed: i64,
    /// Lowest leftover observed.
    pub min_leftover: i64,
    /// Highest leftover observed.
    pub max_leftover: i64,
    /// Mean leftover across the bucket's snapshots.
    pub avg_leftover: f64,
    /// Number of snapshots in the bucket (always at least 1).
    pub snapshot_count: usize,
}

/// Per-calendar-day bucket, keyed `YYYY-MM-DD`.
pub type DailyBucket = UsageBucket<NaiveDate>;

/// Per-ISO-week bucket, keyed `YYYY-Www`.
pub type WeeklyBucket = UsageBucket<WeekKey>;

// ============================================================================
// Tests
// ============================================================================
