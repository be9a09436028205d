//! End-to-end analytics over an in-memory snapshot series.

use chrono::{DateTime, Duration, TimeZone, Utc};
use syntrack_core::{
    AnalyticsConfig, AsciiGrid, BurnRate, ChartConfig, NormalizedSeries, Projection, Snapshot,
    SnapshotId, SnapshotSource, Sparkline, SvgChart, UsageAnalytics, normalized_bars,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
}

fn snapshot(id: i64, at: DateTime<Utc>, limit: i64, used: i64) -> Snapshot {
    Snapshot {
        id: SnapshotId(id),
        collected_at: at,
        subscription_limit: limit,
        requests_used: used,
        renews_at: None,
    }
}

#[test]
fn test_day_of_usage_end_to_end() {
    let rows = vec![
        snapshot(1, t0(), 1000, 0),
        snapshot(2, t0() + Duration::hours(24), 1000, 240),
    ];
    let now = t0() + Duration::hours(24);
    let analytics = UsageAnalytics::new(&rows, AnalyticsConfig::default());

    let rate = analytics.burn_rate_at(now, 24).unwrap();
    assert_eq!(rate.per_hour(), 10.0);
    assert_eq!(rate.samples(), 2);

    let daily = analytics.daily_buckets(1).unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].requests_consumed, 240);

    let report = analytics.burn_rate_report(now).unwrap();
    assert_eq!(report.current_leftover, Some(760));
    assert_eq!(report.projection.hours(), Some(76.0));
    assert_eq!(
        report.projection,
        Projection::Remaining {
            hours: 76.0,
            at: now + Duration::hours(76),
        }
    );
}

#[test]
fn test_single_snapshot_end_to_end() {
    let rows = vec![snapshot(1, t0(), 1000, 100)];
    let analytics = UsageAnalytics::new(&rows, AnalyticsConfig::default());

    assert_eq!(analytics.latest().unwrap(), Some(rows[0].clone()));
    assert_eq!(analytics.range(t0() - Duration::days(1)).unwrap().len(), 1);

    let err = NormalizedSeries::from_snapshots(&rows).unwrap_err();
    assert_eq!(err.available, 1);

    let rate = analytics.burn_rate_at(t0() + Duration::hours(1), 24).unwrap();
    assert_eq!(rate, BurnRate::Insufficient { samples: 1 });
    assert_eq!(rate.per_hour(), 0.0);

    let report = analytics.burn_rate_report(t0() + Duration::hours(1)).unwrap();
    assert_eq!(report.projection, Projection::Unavailable);
}

#[test]
fn test_empty_series() {
    let rows: Vec<Snapshot> = Vec::new();
    let analytics = UsageAnalytics::new(&rows, AnalyticsConfig::default());

    assert_eq!(analytics.latest().unwrap(), None);
    assert!(analytics.current_status(t0()).unwrap().is_none());
    assert!(analytics.daily_buckets(7).unwrap().is_empty());
    assert!(analytics.weekly_buckets(4).unwrap().is_empty());
    assert!(analytics.burn_rate_at(t0(), 24).unwrap().is_insufficient());

    let stats = analytics.overall().unwrap();
    assert_eq!(stats.total_snapshots, 0);
    assert_eq!(stats.avg_daily, None);
}

#[test]
fn test_source_range_is_sorted_and_inclusive() {
    let rows = vec![
        snapshot(3, t0() + Duration::hours(2), 100, 30),
        snapshot(1, t0(), 100, 10),
        snapshot(2, t0() + Duration::hours(1), 100, 20),
    ];
    let since = t0() + Duration::hours(1);
    let range = rows.range(since).unwrap();
    let ids: Vec<i64> = range.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(rows.latest().unwrap().map(|s| s.id), Some(SnapshotId(3)));
}

#[test]
fn test_today_and_yesterday_summaries() {
    let rows = vec![
        snapshot(1, t0() + Duration::hours(8), 1000, 100),
        snapshot(2, t0() + Duration::hours(20), 1000, 180),
        snapshot(3, t0() + Duration::hours(30), 1000, 260),
    ];
    let now = t0() + Duration::hours(31);
    let analytics = UsageAnalytics::new(&rows, AnalyticsConfig::default());

    let today = analytics.day_summary_relative(now, 0).unwrap();
    assert_eq!(today.snapshots, 1);
    assert_eq!(today.consumed, 80);
    assert_eq!(today.last.as_ref().map(|l| l.requests_used), Some(260));

    let yesterday = analytics.day_summary_relative(now, -1).unwrap();
    assert_eq!(yesterday.snapshots, 2);
    assert_eq!(yesterday.consumed, 80);
}

#[test]
fn test_renderers_share_normalization() {
    let rows: Vec<Snapshot> = (0..5)
        .map(|i| snapshot(i + 1, t0() + Duration::hours(i), 400, i * 100))
        .collect();
    let series = NormalizedSeries::from_snapshots(&rows).unwrap();
    let chart = ChartConfig::default();

    let xs: Vec<f64> = series.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);

    let grid = AsciiGrid::render(&series, chart.grid_width, chart.grid_height);
    assert_eq!(grid.cell(0, chart.grid_height - 1), Some('#'));
    assert_eq!(grid.cell(chart.grid_width - 1, 0), Some('#'));

    let spark = Sparkline::render(&series, chart.sparkline_width);
    assert_eq!(spark.used, " ▂▄▆█");

    let svg = SvgChart::map(&series, &chart);
    assert_eq!(svg.used.len(), 5);
    assert_eq!(svg.used[2].x, 400.0);
    assert_eq!(svg.used[2].y, 200.0);
}

#[test]
fn test_daily_bars_from_buckets() {
    let rows = vec![
        snapshot(1, t0(), 1000, 0),
        snapshot(2, t0() + Duration::hours(12), 1000, 100),
        snapshot(3, t0() + Duration::hours(36), 1000, 150),
    ];
    let analytics = UsageAnalytics::new(&rows, AnalyticsConfig::default());
    let daily = analytics.daily_buckets(7).unwrap();
    // most recent first: day 2 consumed 50, day 1 consumed 100
    let bars = normalized_bars(daily, 30, |b| b.requests_consumed);
    let filled: Vec<usize> = bars.iter().map(|b| b.filled).collect();
    assert_eq!(filled, vec![15, 30]);
}

#[test]
fn test_unbounded_lookback_saturates() {
    let rows = vec![
        snapshot(1, t0(), 1000, 0),
        snapshot(2, t0() + Duration::hours(10), 1000, 100),
    ];
    let now = t0() + Duration::hours(10);
    let analytics = UsageAnalytics::new(&rows, AnalyticsConfig::default());

    assert_eq!(analytics.recent(now, u32::MAX).unwrap().len(), 2);

    let rate = analytics.burn_rate_at(now, u32::MAX).unwrap();
    assert_eq!(rate.samples(), 2);
    assert_eq!(rate.per_hour(), 10.0);

    let far_back = analytics.day_summary_relative(now, i64::MIN).unwrap();
    assert_eq!(far_back.snapshots, 0);
    assert_eq!(far_back.consumed, 0);
}
