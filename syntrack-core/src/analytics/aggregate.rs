//! Daily and weekly aggregation.
//!
//! Snapshots are grouped by a key derived from `collected_at` in the
//! configured [`BucketZone`]. Only keys that have snapshots produce a bucket.
//!
//! Consumption for a bucket is `closing - opening`, floored at zero:
//! `closing` is the last reading in the bucket, `opening` is the last reading
//! before the bucket started (or the bucket's first reading when there is no
//! earlier one). A counter reset inside a bucket therefore reports zero, never
//! a negative number.

use chrono::NaiveDate;

use crate::config::BucketZone;
use crate::models::{DailyBucket, Snapshot, UsageBucket, WeekKey, WeeklyBucket};

// ============================================================================
// Public API
// ============================================================================

/// Groups snapshots by calendar day, most recent day first.
///
/// Returns at most `limit` buckets.
pub fn daily_buckets(snapshots: &[Snapshot], limit: usize, zone: BucketZone) -> Vec<DailyBucket> {
    bucketize(snapshots, limit, |s| zone.date_of(s.collected_at))
}

/// Groups snapshots by ISO week (Monday start), most recent week first.
///
/// Returns at most `limit` buckets.
pub fn weekly_buckets(
    snapshots: &[Snapshot],
    limit: usize,
    zone: BucketZone,
) -> Vec<WeeklyBucket> {
    bucketize(snapshots, limit, |s| WeekKey::of(zone.date_of(s.collected_at)))
}

/// Returns the bucket for a single day, if any snapshot falls on it.
pub fn bucket_for_day(
    snapshots: &[Snapshot],
    day: NaiveDate,
    zone: BucketZone,
) -> Option<DailyBucket> {
    daily_buckets(snapshots, usize::MAX, zone)
        .into_iter()
        .find(|b| b.key == day)
}

/// Returns the bucket for a single week, if any snapshot falls in it.
pub fn bucket_for_week(
    snapshots: &[Snapshot],
    week: WeekKey,
    zone: BucketZone,
) -> Option<WeeklyBucket> {
    weekly_buckets(snapshots, usize::MAX, zone)
        .into_iter()
        .find(|b| b.key == week)
}

// ============================================================================
// Grouping
// ============================================================================

/// Running totals for one bucket.
struct Accumulator<K> {
    key: K,
    opening: i64,
    closing: i64,
    min_leftover: i64,
    max_leftover: i64,
    leftover_sum: f64,
    count: usize,
}

impl<K> Accumulator<K> {
    fn start(key: K, opening: i64, first: &Snapshot) -> Self {
        let leftover = first.leftover();
        Self {
            key,
            opening,
            closing: first.requests_used,
            min_leftover: leftover,
            max_leftover: leftover,
            leftover_sum: leftover as f64,
            count: 1,
        }
    }

    fn push(&mut self, snapshot: &Snapshot) {
        let leftover = snapshot.leftover();
        self.closing = snapshot.requests_used;
        self.min_leftover = self.min_leftover.min(leftover);
        self.max_leftover = self.max_leftover.max(leftover);
        self.leftover_sum += leftover as f64;
        self.count += 1;
    }

    fn finish(self) -> UsageBucket<K> {
        UsageBucket {
            key: self.key,
            requests_consumed: self.closing.saturating_sub(self.opening).max(0),
            min_leftover: self.min_leftover,
            max_leftover: self.max_leftover,
            avg_leftover: self.leftover_sum / self.count as f64,
            snapshot_count: self.count,
        }
    }
}

fn bucketize<K, F>(snapshots: &[Snapshot], limit: usize, key_of: F) -> Vec<UsageBucket<K>>
where
    K: PartialEq + Copy,
    F: Fn(&Snapshot) -> K,
{
    if limit == 0 {
        return Vec::new();
    }

    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|s| (s.collected_at, s.id));

    let mut buckets = Vec::new();
    let mut current: Option<Accumulator<K>> = None;

    for snapshot in ordered {
        let key = key_of(snapshot);
        if let Some(acc) = current.as_mut().filter(|acc| acc.key == key) {
            acc.push(snapshot);
            continue;
        }

        let opening = current
            .as_ref()
            .map_or(snapshot.requests_used, |prev| prev.closing);
        if let Some(done) = current.replace(Accumulator::start(key, opening, snapshot)) {
            buckets.push(done.finish());
        }
    }
    if let Some(done) = current {
        buckets.push(done.finish());
    }

    buckets.reverse();
    buckets.truncate(limit);
    buckets
}

// ============================================================================
// Tests
// ============================================================================
