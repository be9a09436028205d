//! Read facade over a snapshot source.
//!
//! Every call re-reads the source; nothing is cached between calls.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::aggregate::{daily_buckets, weekly_buckets};
use super::burn::{BurnRate, burn_rate};
use super::reports::{BurnRateReport, CurrentStatus, DaySummary, OverallStats, WeekSummary};
use crate::config::AnalyticsConfig;
use crate::models::{DailyBucket, Snapshot, WeeklyBucket};
use crate::traits::SnapshotSource;

/// Derived views over a [`SnapshotSource`].
pub struct UsageAnalytics<'a, S: SnapshotSource + ?Sized> {
    source: &'a S,
    config: AnalyticsConfig,
}

impl<'a, S: SnapshotSource + ?Sized> UsageAnalytics<'a, S> {
    /// Creates a facade over `source`.
    pub fn new(source: &'a S, config: AnalyticsConfig) -> Self {
        Self { source, config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Most recent snapshot, if any.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn latest(&self) -> Result<Option<Snapshot>, S::Error> {
        self.source.latest()
    }

    /// Snapshots collected at or after `since`, ascending.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn range(&self, since: DateTime<Utc>) -> Result<Vec<Snapshot>, S::Error> {
        self.source.range(since)
    }

    /// Snapshots from the last `days` days before `now`.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn recent(&self, now: DateTime<Utc>, days: u32) -> Result<Vec<Snapshot>, S::Error> {
        self.source
            .range(lookback(now, Duration::try_days(i64::from(days))))
    }

    /// Daily buckets, most recent first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn daily_buckets(&self, limit: usize) -> Result<Vec<DailyBucket>, S::Error> {
        let rows = self.source.all()?;
        Ok(daily_buckets(&rows, limit, self.config.zone))
    }

    /// Weekly buckets, most recent first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn weekly_buckets(&self, limit: usize) -> Result<Vec<WeeklyBucket>, S::Error> {
        let rows = self.source.all()?;
        Ok(weekly_buckets(&rows, limit, self.config.zone))
    }

    /// Burn rate over the trailing `window_hours`, ending now.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn burn_rate(&self, window_hours: u32) -> Result<BurnRate, S::Error> {
        self.burn_rate_at(Utc::now(), window_hours)
    }

    /// Burn rate over the `window_hours` before `now`.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn burn_rate_at(
        &self,
        now: DateTime<Utc>,
        window_hours: u32,
    ) -> Result<BurnRate, S::Error> {
        let window_start = lookback(now, Duration::try_hours(i64::from(window_hours)));
        let rows = self.source.range(window_start)?;
        Ok(burn_rate(&rows, window_start))
    }

    /// Current quota status, or `None` before the first collection.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn current_status(&self, now: DateTime<Utc>) -> Result<Option<CurrentStatus>, S::Error> {
        Ok(self
            .source
            .latest()?
            .map(|s| CurrentStatus::from_snapshot(&s, now)))
    }

    /// Summary of one calendar day in the configured zone.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn day_summary(&self, date: NaiveDate) -> Result<DaySummary, S::Error> {
        let rows = self.source.all()?;
        Ok(DaySummary::build(&rows, date, self.config.zone))
    }

    /// Summary of the day `offset_days` away from the day containing `now`.
    ///
    /// `0` is today, `-1` yesterday.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn day_summary_relative(
        &self,
        now: DateTime<Utc>,
        offset_days: i64,
    ) -> Result<DaySummary, S::Error> {
        let today = self.config.zone.date_of(now);
        let date = Duration::try_days(offset_days)
            .and_then(|offset| today.checked_add_signed(offset))
            .unwrap_or(if offset_days < 0 {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            });
        self.day_summary(date)
    }

    /// Summary of the ISO week containing `now`.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn week_summary(&self, now: DateTime<Utc>) -> Result<WeekSummary, S::Error> {
        let rows = self.source.all()?;
        let today = self.config.zone.date_of(now);
        Ok(WeekSummary::build(&rows, today, self.config.zone))
    }

    /// Burn rate over the configured window plus the exhaustion projection.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn burn_rate_report(&self, now: DateTime<Utc>) -> Result<BurnRateReport, S::Error> {
        let hours = self.config.burn_window_hours;
        let rate = self.burn_rate_at(now, hours)?;
        let latest = self.source.latest()?;
        Ok(BurnRateReport::build(rate, latest.as_ref(), hours, now))
    }

    /// Whole-history statistics.
    ///
    /// # Errors
    ///
    /// Propagates the source's read error.
    pub fn overall(&self) -> Result<OverallStats, S::Error> {
        let rows = self.source.all()?;
        Ok(OverallStats::build(&rows))
    }
}

/// `now - span`, clamped to the earliest representable instant.
fn lookback(now: DateTime<Utc>, span: Option<Duration>) -> DateTime<Utc> {
    span.and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
