//! Snapshot types.
//!
//! - [`Snapshot`] - One stored observation of quota state
//! - [`QuotaSample`] - What a collector hands to the store
//! - [`SnapshotId`] - Store-assigned ordering key

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analytics::usage_percent;

// ============================================================================
// Snapshot Id
// ============================================================================

/// Opaque, store-assigned, monotonically increasing row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub i64);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// One point-in-time observation of quota limit and usage.
///
/// There is no `leftover` field. [`Snapshot::leftover`] recomputes it from
/// the limit and the usage on every call, and the serialized form carries a
/// computed `leftover` that is discarded again on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SnapshotRecord", from = "SnapshotRecord")]
pub struct Snapshot {
    /// Store-assigned id.
    pub id: SnapshotId,
    /// When the sample was taken.
    pub collected_at: DateTime<Utc>,
    /// Quota size at collection time.
    pub subscription_limit: i64,
    /// Requests consumed in the current quota period.
    pub requests_used: i64,
    /// When the quota renews, if the service reported it.
    pub renews_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Returns `subscription_limit - requests_used`.
    ///
    /// Negative when usage exceeds the limit; never clamped.
    pub fn leftover(&self) -> i64 {
        self.subscription_limit.saturating_sub(self.requests_used)
    }

    /// Returns the used share of the limit as a percentage.
    ///
    /// `None` when the limit is zero.
    pub fn usage_percent(&self) -> Option<f64> {
        usage_percent(self.requests_used, self.subscription_limit)
    }

    /// Returns true if usage has reached or passed the limit.
    pub fn is_exhausted(&self) -> bool {
        self.leftover() <= 0
    }

    /// Returns the time until renewal relative to `now`, if known.
    pub fn time_until_renewal(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.renews_at.map(|at| at - now)
    }
}

/// Wire form of a [`Snapshot`], with the derived leftover spelled out.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotRecord {
    id: SnapshotId,
    collected_at: DateTime<Utc>,
    subscription_limit: i64,
    requests_used: i64,
    #[serde(default)]
    leftover: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    renews_at: Option<DateTime<Utc>>,
}

impl From<Snapshot> for SnapshotRecord {
    fn from(s: Snapshot) -> Self {
        Self {
            leftover: s.leftover(),
            id: s.id,
            collected_at: s.collected_at,
            subscription_limit: s.subscription_limit,
            requests_used: s.requests_used,
            renews_at: s.renews_at,
        }
    }
}

impl From<SnapshotRecord> for Snapshot {
    fn from(r: SnapshotRecord) -> Self {
        Self {
            id: r.id,
            collected_at: r.collected_at,
            subscription_limit: r.subscription_limit,
            requests_used: r.requests_used,
            renews_at: r.renews_at,
        }
    }
}

// ============================================================================
// Quota Sample
// ============================================================================

/// A quota reading handed to the store by a collector.
///
/// Values are not validated: negative or inconsistent numbers are stored
/// as-is and show up unchanged downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSample {
    /// Quota size.
    pub subscription_limit: i64,
    /// Requests consumed.
    pub requests_used: i64,
    /// When the quota renews.
    #[serde(default)]
    pub renews_at: Option<DateTime<Utc>>,
    /// When the reading was taken. The store stamps the current time if unset.
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl QuotaSample {
    /// Creates a sample without timestamps.
    pub fn new(subscription_limit: i64, requests_used: i64) -> Self {
        Self {
            subscription_limit,
            requests_used,
            renews_at: None,
            observed_at: None,
        }
    }

    /// Sets the renewal time.
    #[must_use]
    pub fn renewing_at(mut self, renews_at: DateTime<Utc>) -> Self {
        self.renews_at = Some(renews_at);
        self
    }

    /// Sets the observation time.
    #[must_use]
    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }

    /// Returns the leftover this sample will have once stored.
    pub fn leftover(&self) -> i64 {
        self.subscription_limit.saturating_sub(self.requests_used)
    }
}
