//! Trait definitions for Syntrack.
//!
//! [`SnapshotSource`] is the seam between the analytics facade and whatever
//! holds the rows. The SQLite store implements it; so does a plain slice,
//! which keeps analytics tests free of any database.

use chrono::{DateTime, Utc};
use std::convert::Infallible;

use crate::models::Snapshot;

/// Read access to an append-only snapshot series.
pub trait SnapshotSource {
    /// Error raised by the backing medium.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the most recent snapshot by `collected_at`, or `None` when
    /// the series is empty.
    ///
    /// # Errors
    ///
    /// Returns the backing medium's error if the read fails.
    fn latest(&self) -> Result<Option<Snapshot>, Self::Error>;

    /// Returns every snapshot with `collected_at >= since`, ascending by
    /// time and free of duplicates.
    ///
    /// # Errors
    ///
    /// Returns the backing medium's error if the read fails.
    fn range(&self, since: DateTime<Utc>) -> Result<Vec<Snapshot>, Self::Error>;

    /// Returns every snapshot.
    ///
    /// # Errors
    ///
    /// Returns the backing medium's error if the read fails.
    fn all(&self) -> Result<Vec<Snapshot>, Self::Error> {
        self.range(DateTime::<Utc>::MIN_UTC)
    }
}

impl SnapshotSource for [Snapshot] {
    type Error = Infallible;

    fn latest(&self) -> Result<Option<Snapshot>, Self::Error> {
        Ok(self
            .iter()
            .max_by_key(|s| (s.collected_at, s.id))
            .cloned())
    }

    fn range(&self, since: DateTime<Utc>) -> Result<Vec<Snapshot>, Self::Error> {
        let mut rows: Vec<Snapshot> = self
            .iter()
            .filter(|s| s.collected_at >= since)
            .cloned()
            .collect();
        rows.sort_by_key(|s| (s.collected_at, s.id));
        rows.dedup_by_key(|s| s.id);
        Ok(rows)
    }
}

impl SnapshotSource for Vec<Snapshot> {
    type Error = Infallible;

    fn latest(&self) -> Result<Option<Snapshot>, Self::Error> {
        self.as_slice().latest()
    }

    fn range(&self, since: DateTime<Utc>) -> Result<Vec<Snapshot>, Self::Error> {
        self.as_slice().range(since)
    }
}
