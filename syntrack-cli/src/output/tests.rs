//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{TextFormatter, bar_string, format_minutes};
    use chrono::{Duration, TimeZone, Utc};
    use syntrack_core::{CurrentStatus, Snapshot, SnapshotId};

    fn snapshot(id: i64, hours: i64, limit: i64, used: i64) -> Snapshot {
        Snapshot {
            id: SnapshotId(id),
            collected_at: Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
                + Duration::hours(hours),
            subscription_limit: limit,
            requests_used: used,
            renews_at: None,
        }
    }

    #[test]
    fn test_bar_string_empty() {
        assert_eq!(bar_string(0, 10), "░░░░░░░░░░");
    }

    #[test]
    fn test_bar_string_full() {
        assert_eq!(bar_string(10, 10), "██████████");
    }

    #[test]
    fn test_bar_string_clamps_overflow() {
        assert_eq!(bar_string(15, 4), "████");
    }

    #[test]
    fn test_meter_boundary_values() {
        let formatter = TextFormatter::new(false);

        let test_cases = vec![
            (0, "  [░░░░░░░░░░] 0%"),
            (250, "  [██░░░░░░░░] 25%"),
            (500, "  [█████░░░░░] 50%"),
            (1000, "  [██████████] 100%"),
        ];

        for (used, expected) in test_cases {
            assert_eq!(formatter.meter(used, 1000, 10), expected, "Failed for {used}");
        }
    }

    #[test]
    fn test_meter_zero_limit() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.meter(5, 0, 4), "  [████] n/a");
    }

    #[test]
    fn test_meter_with_colors() {
        let formatter = TextFormatter::new(true);

        // 10% left - red
        let meter = formatter.meter(900, 1000, 10);
        assert!(meter.contains("\x1b[31m"), "Should be red for <20% left");

        // 70% left - green
        let meter = formatter.meter(300, 1000, 10);
        assert!(meter.contains("\x1b[32m"), "Should be green for >=50% left");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "overdue");
        assert_eq!(format_minutes(-30), "overdue");
        assert_eq!(format_minutes(45), "in 45m");
        assert_eq!(format_minutes(125), "in 2h 5m");
        assert_eq!(format_minutes(3 * 24 * 60 + 4 * 60 + 10), "in 3d 4h");
    }

    #[test]
    fn test_format_status_no_colors() {
        let formatter = TextFormatter::new(false);
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let mut snap = snapshot(1, 0, 1000, 250);
        snap.renews_at = Some(now + Duration::minutes(90));
        let status = CurrentStatus::from_snapshot(&snap, now);

        let output = formatter.format_status(&status);
        assert!(output.starts_with("Current Status (as of "));
        assert!(output.contains("  Limit:     1000"));
        assert!(output.contains("  Used:      250"));
        assert!(output.contains("  Leftover:  750"));
        assert!(output.contains("  Usage:     25.0%"));
        assert!(output.contains("(in 1h 30m)"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_format_history_newest_first() {
        let formatter = TextFormatter::new(false);
        let snapshots = vec![snapshot(1, 0, 1000, 100), snapshot(2, 1, 1000, 200)];

        let output = formatter.format_history(&snapshots, 7);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Usage History (last 7 days)");
        assert_eq!(lines.len(), 6);
        assert!(lines[4].contains("200"));
        assert!(lines[5].contains("100"));
        assert!(lines[5].trim_end().ends_with("10.0%"));
    }

    #[test]
    fn test_format_recorded() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_recorded(&snapshot(7, 0, 1000, 400));
        assert_eq!(output, "Recorded snapshot #7: 400 / 1000 used, 600 left");
    }

    #[test]
    fn test_format_recorded_flags_exhaustion() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_recorded(&snapshot(8, 0, 1000, 1000));
        assert_eq!(
            output,
            "Recorded snapshot #8: 1000 / 1000 used, 0 left (quota exhausted)"
        );

        let output = formatter.format_recorded(&snapshot(9, 0, 1000, 1200));
        assert!(output.ends_with("-200 left (quota exhausted)"));
    }
}

#[cfg(test)]
mod chart_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use syntrack_core::{
        AsciiGrid, DailyBucket, NormalizedSeries, Snapshot, SnapshotId, Sparkline, UsageBucket,
        normalized_bars,
    };

    fn series(values: &[i64]) -> NormalizedSeries {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let snapshots: Vec<Snapshot> = values
            .iter()
            .enumerate()
            .map(|(i, &used)| Snapshot {
                id: SnapshotId(i as i64 + 1),
                collected_at: t0 + Duration::days(i as i64),
                subscription_limit: 100,
                requests_used: used,
                renews_at: None,
            })
            .collect();
        NormalizedSeries::from_snapshots(&snapshots).unwrap()
    }

    fn bucket(day: u32, consumed: i64) -> DailyBucket {
        UsageBucket {
            key: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            requests_consumed: consumed,
            min_leftover: 0,
            max_leftover: 0,
            avg_leftover: 0.0,
            snapshot_count: 2,
        }
    }

    #[test]
    fn test_usage_chart_layout() {
        let formatter = TextFormatter::new(false);
        let series = series(&[0, 50, 100]);
        let grid = AsciiGrid::render(&series, 10, 4);

        let output = formatter.format_usage_chart(&series, &grid, 5);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[1], "     Usage Chart (last 3 data points)");
        assert!(lines[3].starts_with(" 100 │"));
        assert!(lines[6].starts_with("   0 │"));
        assert!(lines[7].starts_with("     └"));
        assert!(output.contains("Legend: # = Used  . = Leftover"));
        assert!(output.contains("Data range: "));
    }

    #[test]
    fn test_bar_chart_rows() {
        let formatter = TextFormatter::new(false);
        let bars = normalized_bars(vec![bucket(3, 10), bucket(2, 5)], 4, |b| {
            b.requests_consumed
        });

        let output = formatter.format_bar_chart("Daily Requests Consumed", &bars, 4);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[1], "  Daily Requests Consumed");
        assert_eq!(lines[3], "  2026-03-03 │████│ 10");
        assert_eq!(lines[4], "  2026-03-02 │██░░│ 5");
    }

    #[test]
    fn test_sparkline_block() {
        let formatter = TextFormatter::new(false);
        let spark = Sparkline::render(&series(&[0, 100]), 40);

        let output = formatter.format_sparkline(&spark);
        assert_eq!(output, "  Used:   █\n  Left:  █ ");
    }
}

#[cfg(test)]
mod stats_formatter_tests {
    use super::super::json::StatsReport;
    use super::super::text::{StatsWidths, TextFormatter};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use syntrack_core::{
        BurnRate, BurnRateReport, CurrentStatus, OverallStats, Snapshot, SnapshotId,
    };

    const WIDTHS: StatsWidths = StatsWidths { meter: 10, bars: 10 };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn latest(used: i64) -> Snapshot {
        Snapshot {
            id: SnapshotId(2),
            collected_at: now() - Duration::hours(1),
            subscription_limit: 1000,
            requests_used: used,
            renews_at: None,
        }
    }

    fn report(rate: BurnRate, used: i64) -> StatsReport {
        let snap = latest(used);
        StatsReport {
            current: CurrentStatus::from_snapshot(&snap, now()),
            burn_rate: BurnRateReport::build(rate, Some(&snap), 24, now()),
            daily: Vec::new(),
            weekly: Vec::new(),
            overall: OverallStats::build(std::slice::from_ref(&snap)),
            trend: None,
        }
    }

    fn measured(per_hour: f64) -> BurnRate {
        BurnRate::Measured {
            per_hour,
            samples: 2,
            elapsed_hours: 10.0,
        }
    }

    fn burn_section(output: &str) -> Vec<&str> {
        output
            .lines()
            .skip_while(|line| !line.starts_with("Burn Rate (24h)"))
            .skip(2)
            .take_while(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn test_insufficient_rate() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_stats(
            &report(BurnRate::Insufficient { samples: 1 }, 100),
            false,
            WIDTHS,
        );
        assert_eq!(burn_section(&output), vec!["  Not enough data to calculate"]);
    }

    #[test]
    fn test_measured_zero_rate_shows_rate() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_stats(&report(measured(0.0), 100), false, WIDTHS);
        assert_eq!(
            burn_section(&output),
            vec![
                "  Rate:      0.00 requests/hour",
                "  Est. left: no projection (usage is not increasing)",
            ]
        );
    }

    #[test]
    fn test_exhausted_quota() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_stats(&report(measured(12.5), 1000), false, WIDTHS);
        assert_eq!(
            burn_section(&output),
            vec![
                "  Rate:      12.50 requests/hour",
                "  Est. left: quota exhausted",
            ]
        );
    }

    #[test]
    fn test_remaining_hours_and_days() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_stats(&report(measured(10.0), 520), false, WIDTHS);
        assert_eq!(
            burn_section(&output),
            vec![
                "  Rate:      10.00 requests/hour",
                "  Est. left: 48.0 hours (2.0 days)",
            ]
        );
    }

    #[test]
    fn test_stats_layout_without_buckets() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_stats(&report(measured(10.0), 250), false, WIDTHS);

        assert!(output.contains("USAGE STATISTICS"));
        assert!(output.contains("  Used:      250 / 1000 (25.0%)"));
        assert!(output.contains("  Leftover:  750"));
        assert!(output.contains("  [██░░░░░░░░] 25%"));
        assert!(output.contains("  Total snapshots: 1"));
        assert_eq!(output.matches("  No data yet").count(), 2);
        assert!(!output.contains("Usage Trend"));
        assert!(!output.contains("\x1b["));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{HistoryEntry, JsonFormatter, QueryOutput};
    use chrono::{TimeZone, Utc};
    use syntrack_core::{Snapshot, SnapshotId};

    fn snapshot() -> Snapshot {
        Snapshot {
            id: SnapshotId(3),
            collected_at: Utc.with_ymd_and_hms(2026, 3, 2, 8, 30, 0).unwrap(),
            subscription_limit: 1000,
            requests_used: 250,
            renews_at: None,
        }
    }

    #[test]
    fn test_history_entry_fields() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_history(&[snapshot()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        let entry = &parsed[0];
        assert_eq!(entry["timestamp"], "2026-03-02T08:30:00+00:00");
        assert_eq!(entry["limit"], 1000);
        assert_eq!(entry["used"], 250);
        assert_eq!(entry["leftover"], 750);
        assert_eq!(entry["usage_percent"], 25.0);
    }

    #[test]
    fn test_compact_vs_pretty() {
        let entries = vec![HistoryEntry::from(&snapshot())];

        let compact = JsonFormatter::new(false).format(&entries).unwrap();
        assert!(!compact.contains('\n'));

        let pretty = JsonFormatter::new(true).format(&entries).unwrap();
        assert!(pretty.contains('\n'));
        assert!(pretty.contains("  "));
    }

    #[test]
    fn test_query_current_without_data_is_null() {
        let output = JsonFormatter::new(false)
            .format(&QueryOutput::Current(None))
            .unwrap();
        assert_eq!(output, "null");
    }

    #[test]
    fn test_notice() {
        let output = JsonFormatter::new(false)
            .format_notice("No data available.", Some(0))
            .unwrap();
        assert_eq!(output, r#"{"notice":"No data available.","available":0}"#);

        let output = JsonFormatter::new(false)
            .format_notice("empty", None)
            .unwrap();
        assert_eq!(output, r#"{"notice":"empty"}"#);
    }
}
