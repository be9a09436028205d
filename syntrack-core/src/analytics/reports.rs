//! Report builders.
//!
//! Each report is plain serializable data, so the terminal printer and the
//! JSON output consume the same structures.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::{bucket_for_day, bucket_for_week};
use super::burn::BurnRate;
use super::projection::Projection;
use super::usage_percent;
use crate::config::BucketZone;
use crate::models::{Snapshot, WeekKey};

// ============================================================================
// Current Status
// ============================================================================

/// Quota state as of the latest snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStatus {
    /// When the latest snapshot was taken.
    pub collected_at: DateTime<Utc>,
    /// Quota size.
    pub limit: i64,
    /// Requests consumed.
    pub used: i64,
    /// `limit - used`.
    pub leftover: i64,
    /// Used share of the limit; absent when the limit is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_percent: Option<f64>,
    /// When the quota renews.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renews_at: Option<DateTime<Utc>>,
    /// Minutes until renewal, relative to the report time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_until_renewal: Option<i64>,
}

impl CurrentStatus {
    /// Builds the status from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot, now: DateTime<Utc>) -> Self {
        Self {
            collected_at: snapshot.collected_at,
            limit: snapshot.subscription_limit,
            used: snapshot.requests_used,
            leftover: snapshot.leftover(),
            usage_percent: snapshot.usage_percent(),
            renews_at: snapshot.renews_at,
            minutes_until_renewal: snapshot
                .time_until_renewal(now)
                .map(|d| d.num_minutes()),
        }
    }
}

// ============================================================================
// Last Reading
// ============================================================================

/// The final reading inside a day or week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastReading {
    /// When it was taken.
    pub collected_at: DateTime<Utc>,
    /// Requests consumed at that point.
    pub requests_used: i64,
    /// Quota size at that point.
    pub requests_limit: i64,
    /// Leftover at that point.
    pub leftover: i64,
    /// Used share of the limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_percent: Option<f64>,
}

impl From<&Snapshot> for LastReading {
    fn from(s: &Snapshot) -> Self {
        Self {
            collected_at: s.collected_at,
            requests_used: s.requests_used,
            requests_limit: s.subscription_limit,
            leftover: s.leftover(),
            usage_percent: s.usage_percent(),
        }
    }
}

fn last_matching<'a>(
    snapshots: &'a [Snapshot],
    keep: impl Fn(&Snapshot) -> bool,
) -> Option<&'a Snapshot> {
    snapshots
        .iter()
        .filter(|s| keep(s))
        .max_by_key(|s| (s.collected_at, s.id))
}

// ============================================================================
// Day Summary
// ============================================================================

/// Usage summary for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// The day.
    pub date: NaiveDate,
    /// Requests consumed during the day; same rule as daily buckets.
    pub consumed: i64,
    /// Snapshots taken that day.
    pub snapshots: usize,
    /// Final reading of the day, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<LastReading>,
}

impl DaySummary {
    /// Summarizes `date` from the full snapshot series.
    pub fn build(snapshots: &[Snapshot], date: NaiveDate, zone: BucketZone) -> Self {
        let bucket = bucket_for_day(snapshots, date, zone);
        let last = last_matching(snapshots, |s| zone.date_of(s.collected_at) == date);
        Self {
            date,
            consumed: bucket.as_ref().map_or(0, |b| b.requests_consumed),
            snapshots: bucket.as_ref().map_or(0, |b| b.snapshot_count),
            last: last.map(LastReading::from),
        }
    }
}

// ============================================================================
// Week Summary
// ============================================================================

/// Usage summary for one ISO week.
///
/// Boundaries come from [`WeekKey`], the same key the weekly buckets use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummary {
    /// Week key, e.g. `2024-W11`.
    pub week: WeekKey,
    /// Monday of the week.
    pub week_start: NaiveDate,
    /// Monday of the following week (exclusive).
    pub week_end: NaiveDate,
    /// Requests consumed during the week.
    pub consumed: i64,
    /// Snapshots taken that week.
    pub snapshots: usize,
    /// Final reading of the week, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<LastReading>,
}

impl WeekSummary {
    /// Summarizes the week containing `date`.
    pub fn build(snapshots: &[Snapshot], date: NaiveDate, zone: BucketZone) -> Self {
        let week = WeekKey::of(date);
        let bucket = bucket_for_week(snapshots, week, zone);
        let last = last_matching(snapshots, |s| week.contains(zone.date_of(s.collected_at)));
        Self {
            week,
            week_start: week.monday(),
            week_end: week.end(),
            consumed: bucket.as_ref().map_or(0, |b| b.requests_consumed),
            snapshots: bucket.as_ref().map_or(0, |b| b.snapshot_count),
            last: last.map(LastReading::from),
        }
    }
}

// ============================================================================
// Burn Rate Report
// ============================================================================

/// Burn rate together with the exhaustion projection it implies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnRateReport {
    /// When the report was computed.
    pub calculated_at: DateTime<Utc>,
    /// The measured (or insufficient) rate.
    pub rate: BurnRate,
    /// Requests per hour (0 when insufficient).
    pub rate_per_hour: f64,
    /// Requests per day (0 when insufficient).
    pub rate_per_day: f64,
    /// Leftover of the latest snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_leftover: Option<i64>,
    /// Exhaustion projection.
    pub projection: Projection,
    /// Snapshots inside the window.
    pub data_points: usize,
    /// Window length in hours.
    pub period_hours: u32,
}

impl BurnRateReport {
    /// Combines a rate with the latest snapshot.
    pub fn build(
        rate: BurnRate,
        latest: Option<&Snapshot>,
        period_hours: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let current_leftover = latest.map(Snapshot::leftover);
        let projection = current_leftover.map_or(Projection::Unavailable, |leftover| {
            Projection::project(leftover, rate.per_hour(), now)
        });
        Self {
            calculated_at: now,
            rate,
            rate_per_hour: rate.per_hour(),
            rate_per_day: rate.per_day(),
            current_leftover,
            projection,
            data_points: rate.samples(),
            period_hours,
        }
    }
}

// ============================================================================
// Overall Stats
// ============================================================================

/// Whole-history statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    /// Number of stored snapshots.
    pub total_snapshots: usize,
    /// Earliest snapshot time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_at: Option<DateTime<Utc>>,
    /// Latest snapshot time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_at: Option<DateTime<Utc>>,
    /// Average requests per day between the first and last snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_daily: Option<f64>,
}

impl OverallStats {
    /// Computes stats over the full series.
    pub fn build(snapshots: &[Snapshot]) -> Self {
        let first = snapshots.iter().min_by_key(|s| (s.collected_at, s.id));
        let last = snapshots.iter().max_by_key(|s| (s.collected_at, s.id));

        let avg_daily = match (first, last) {
            (Some(first), Some(last)) if snapshots.len() > 1 => {
                let span: Duration = last.collected_at - first.collected_at;
                let days = span.num_milliseconds() as f64 / 86_400_000.0;
                (days > 0.0).then(|| {
                    last.requests_used.saturating_sub(first.requests_used) as f64 / days
                })
            }
            _ => None,
        };

        Self {
            total_snapshots: snapshots.len(),
            first_at: first.map(|s| s.collected_at),
            last_at: last.map(|s| s.collected_at),
            avg_daily,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnapshotId;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn snap(id: i64, collected_at: DateTime<Utc>, limit: i64, used: i64) -> Snapshot {
        Snapshot {
            id: SnapshotId(id),
            collected_at,
            subscription_limit: limit,
            requests_used: used,
            renews_at: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_current_status_zero_limit_has_no_percent() {
        let status = CurrentStatus::from_snapshot(&snap(1, at(11, 0), 0, 5), at(11, 1));
        assert_eq!(status.usage_percent, None);
        assert_eq!(status.leftover, -5);
    }

    #[test]
    fn test_current_status_renewal_countdown() {
        let mut s = snap(1, at(11, 0), 100, 25);
        s.renews_at = Some(at(11, 6));
        let status = CurrentStatus::from_snapshot(&s, at(11, 4));
        assert_eq!(status.usage_percent, Some(25.0));
        assert_eq!(status.minutes_until_renewal, Some(120));
    }

    #[test]
    fn test_day_summary_without_data() {
        let summary = DaySummary::build(&[], day(11), BucketZone::Utc);
        assert_eq!(summary.consumed, 0);
        assert_eq!(summary.snapshots, 0);
        assert!(summary.last.is_none());
    }

    #[test]
    fn test_day_summary_uses_last_reading() {
        let rows = vec![
            snap(1, at(10, 20), 1000, 90),
            snap(2, at(11, 8), 1000, 100),
            snap(3, at(11, 20), 1000, 130),
            snap(4, at(12, 1), 1000, 200),
        ];
        let summary = DaySummary::build(&rows, day(11), BucketZone::Utc);
        assert_eq!(summary.consumed, 40);
        assert_eq!(summary.snapshots, 2);
        let last = summary.last.unwrap();
        assert_eq!(last.requests_used, 130);
        assert_eq!(last.leftover, 870);
    }

    #[test]
    fn test_week_summary_matches_weekly_bucket() {
        // Sunday the 10th and Monday the 11th are in different ISO weeks
        let rows = vec![snap(1, at(10, 12), 1000, 50), snap(2, at(11, 12), 1000, 80)];
        let summary = WeekSummary::build(&rows, day(13), BucketZone::Utc);
        assert_eq!(summary.week.to_string(), "2024-W11");
        assert_eq!(summary.week_start, day(11));
        assert_eq!(summary.week_end, day(18));
        assert_eq!(summary.snapshots, 1);
        assert_eq!(summary.consumed, 30);
    }

    #[test]
    fn test_burn_rate_report_projection() {
        let latest = snap(2, at(12, 0), 1000, 240);
        let rate = BurnRate::Measured {
            per_hour: 10.0,
            samples: 2,
            elapsed_hours: 24.0,
        };
        let report = BurnRateReport::build(rate, Some(&latest), 24, at(12, 0));
        assert_eq!(report.current_leftover, Some(760));
        assert_eq!(report.projection.hours(), Some(76.0));
        assert_eq!(report.rate_per_day, 240.0);
        assert_eq!(report.data_points, 2);
    }

    #[test]
    fn test_burn_rate_report_without_data() {
        let report =
            BurnRateReport::build(BurnRate::Insufficient { samples: 0 }, None, 24, at(12, 0));
        assert_eq!(report.projection, Projection::Unavailable);
        assert_eq!(report.rate_per_hour, 0.0);
    }

    #[test]
    fn test_overall_stats() {
        let rows = vec![snap(1, at(10, 0), 1000, 100), snap(2, at(12, 0), 1000, 300)];
        let stats = OverallStats::build(&rows);
        assert_eq!(stats.total_snapshots, 2);
        assert_eq!(stats.first_at, Some(at(10, 0)));
        assert_eq!(stats.avg_daily, Some(100.0));

        let single = OverallStats::build(&rows[..1]);
        assert_eq!(single.avg_daily, None);
    }
}
