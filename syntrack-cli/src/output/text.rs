//! Text output formatting with bars, charts and colors.

use chrono::{DateTime, Local, Utc};
use std::fmt::Display;
use syntrack_core::{
    AsciiGrid, Bar, BurnRateReport, CurrentStatus, NormalizedSeries, OverallStats, Projection,
    Snapshot, Sparkline, UsageBucket, bar_length,
};

use super::json::StatsReport;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Timestamp format for tables and headers.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Columns before the first grid cell (`"1000 │"`).
const GRID_GUTTER: usize = 6;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Confirmation line for a recorded snapshot.
    pub fn format_recorded(&self, snapshot: &Snapshot) -> String {
        let line = format!(
            "Recorded snapshot #{}: {} / {} used, {} left",
            snapshot.id,
            snapshot.requests_used,
            snapshot.subscription_limit,
            self.color_for_leftover(
                snapshot.usage_percent(),
                &snapshot.leftover().to_string()
            )
        );
        if snapshot.is_exhausted() {
            format!("{line} {}", self.red("(quota exhausted)"))
        } else {
            line
        }
    }

    /// Current quota block.
    pub fn format_status(&self, status: &CurrentStatus) -> String {
        let mut lines = vec![
            self.bold(&format!(
                "Current Status (as of {})",
                local_time(status.collected_at)
            )),
            "─".repeat(29),
            format!("  Limit:     {}", status.limit),
            format!("  Used:      {}", status.used),
            format!(
                "  Leftover:  {}",
                self.color_for_leftover(status.usage_percent, &status.leftover.to_string())
            ),
            format!("  Usage:     {}", percent_text(status.usage_percent)),
        ];

        if let Some(renews_at) = status.renews_at {
            let mut line = format!("  Renews:    {}", local_time(renews_at));
            if let Some(minutes) = status.minutes_until_renewal {
                line.push_str(&self.dim(&format!(" ({})", format_minutes(minutes))));
            }
            lines.push(line);
        }

        lines.join("\n")
    }

    /// Newest-first table of snapshots.
    pub fn format_history(&self, snapshots: &[Snapshot], days: u32) -> String {
        let rule = "─".repeat(65);
        let mut lines = vec![
            self.bold(&format!("Usage History (last {days} days)")),
            rule.clone(),
            format!(
                "{:<20} {:>8} {:>8} {:>8} {:>8}",
                "Time", "Limit", "Used", "Left", "%"
            ),
            rule,
        ];

        for s in snapshots.iter().rev() {
            let pct = s
                .usage_percent()
                .map_or_else(|| "n/a".to_string(), |p| format!("{p:.1}%"));
            lines.push(format!(
                "{:<20} {:>8} {:>8} {:>8} {:>8}",
                local_time(s.collected_at),
                s.subscription_limit,
                s.requests_used,
                s.leftover(),
                pct
            ));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Charts
    // ========================================================================

    /// Character grid with axes, date labels and a legend.
    #[allow(clippy::cast_possible_truncation)]
    pub fn format_usage_chart(
        &self,
        series: &NormalizedSeries,
        grid: &AsciiGrid,
        label_count: usize,
    ) -> String {
        let width = grid.width();
        let height = grid.height();
        let mut lines = vec![
            String::new(),
            format!("     Usage Chart (last {} data points)", series.len()),
            format!("     {}", "─".repeat(width)),
        ];

        for (y, row) in grid.lines().into_iter().enumerate() {
            let label = if y == 0 {
                format!("{:>4}", grid.max_value() as i64)
            } else if y + 1 == height {
                "   0".to_string()
            } else {
                "    ".to_string()
            };
            let row = row
                .replace('#', &self.red("#"))
                .replace('.', &self.green("."));
            lines.push(format!("{label} │{row}"));
        }
        lines.push(format!("     └{}", "─".repeat(width)));

        // Date labels, skipped where they would overlap the previous one
        let mut axis = vec![' '; GRID_GUTTER + width + 5];
        let mut next_free = 0;
        for label in series.axis_labels(label_count) {
            let start = GRID_GUTTER + grid.column_of(label.x);
            let start = start.min(axis.len().saturating_sub(label.text.len()));
            if start < next_free {
                continue;
            }
            for (i, c) in label.text.chars().enumerate() {
                axis[start + i] = c;
            }
            next_free = start + label.text.len() + 1;
        }
        lines.push(axis.into_iter().collect::<String>().trim_end().to_string());

        let (first, last) = series.span();
        lines.push(String::new());
        lines.push(format!(
            "Legend: {} = Used  {} = Leftover",
            self.red("#"),
            self.green(".")
        ));
        lines.push(format!(
            "Data range: {} to {}",
            local_time(first),
            local_time(last)
        ));

        lines.join("\n")
    }

    /// Titled bar chart of bucket consumption.
    pub fn format_bar_chart<K: Display>(
        &self,
        title: &str,
        bars: &[Bar<UsageBucket<K>>],
        width: usize,
    ) -> String {
        let mut lines = vec![
            String::new(),
            format!("  {}", self.bold(title)),
            format!("  {}", "─".repeat(50)),
        ];
        for bar in bars {
            lines.push(format!(
                "  {} │{}│ {}",
                bar.item.key,
                self.cyan(&bar_string(bar.filled, width)),
                bar.value
            ));
        }
        lines.join("\n")
    }

    /// Two-row sparkline block.
    pub fn format_sparkline(&self, spark: &Sparkline) -> String {
        format!(
            "  Used:  {}\n  Left:  {}",
            self.red(&spark.used),
            self.green(&spark.leftover)
        )
    }

    /// `[████░░░░] 42%` style meter.
    pub fn meter(&self, used: i64, limit: i64, width: usize) -> String {
        let filled = bar_length(used, limit, width);
        let pct = syntrack_core::usage_percent(used, limit);
        let bar = bar_string(filled, width);
        format!(
            "  [{}] {}",
            self.color_for_leftover(pct, &bar),
            pct.map_or_else(|| "n/a".to_string(), |p| format!("{p:.0}%"))
        )
    }

    // ========================================================================
    // Stats
    // ========================================================================

    /// Full statistics report.
    pub fn format_stats(&self, report: &StatsReport, chart: bool, widths: StatsWidths) -> String {
        let mut lines = vec![
            "═".repeat(39),
            self.bold("         USAGE STATISTICS"),
            "═".repeat(39),
        ];

        let current = &report.current;
        lines.push(section("Current Status"));
        lines.push(format!(
            "  Used:      {} / {} ({})",
            current.used,
            current.limit,
            percent_text(current.usage_percent)
        ));
        lines.push(format!("  Leftover:  {}", current.leftover));
        lines.push(self.meter(current.used, current.limit, widths.meter));

        lines.push(section(&format!(
            "Burn Rate ({}h)",
            report.burn_rate.period_hours
        )));
        lines.extend(self.burn_rate_lines(&report.burn_rate));

        lines.push(section("Daily Usage"));
        lines.extend(self.bucket_lines("Day", &report.daily, chart, widths.bars));

        lines.push(section("Weekly Usage"));
        lines.extend(self.bucket_lines("Week", &report.weekly, chart, widths.bars));

        lines.push(section("Overall"));
        lines.extend(overall_lines(&report.overall));

        if let Some(trend) = &report.trend {
            lines.push(section("Usage Trend (last 7 days)"));
            lines.push(self.format_sparkline(trend));
        }

        lines.join("\n")
    }

    fn burn_rate_lines(&self, report: &BurnRateReport) -> Vec<String> {
        if report.rate.is_insufficient() {
            return vec!["  Not enough data to calculate".to_string()];
        }

        let estimate = match report.projection {
            Projection::Unavailable => "no projection (usage is not increasing)".to_string(),
            Projection::Exhausted => self.red("quota exhausted"),
            Projection::Remaining { hours, .. } => {
                format!("{:.1} hours ({:.1} days)", hours, hours / 24.0)
            }
        };
        vec![
            format!("  Rate:      {:.2} requests/hour", report.rate_per_hour),
            format!("  Est. left: {estimate}"),
        ]
    }

    fn bucket_lines<K: Display + Clone>(
        &self,
        label: &str,
        buckets: &[UsageBucket<K>],
        chart: bool,
        width: usize,
    ) -> Vec<String> {
        if buckets.is_empty() {
            return vec!["  No data yet".to_string()];
        }

        if chart {
            syntrack_core::normalized_bars(buckets.iter().cloned(), width, |b| {
                b.requests_consumed
            })
            .into_iter()
            .map(|bar| {
                format!(
                    "  {} {} {}",
                    bar.item.key,
                    self.cyan(&bar_string(bar.filled, width)),
                    bar.value
                )
            })
            .collect()
        } else {
            let mut lines = vec![format!("{:<12} {:>10} {:>10}", label, "Consumed", "Avg Left")];
            lines.extend(buckets.iter().map(|b| {
                format!(
                    "{:<12} {:>10} {:>10.0}",
                    b.key.to_string(),
                    b.requests_consumed,
                    b.avg_leftover
                )
            }));
            lines
        }
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_leftover(&self, usage_percent: Option<f64>, text: &str) -> String {
        let Some(used) = usage_percent else {
            return text.to_string();
        };
        let left = 100.0 - used;
        if left < 20.0 {
            self.red(text)
        } else if left < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Bar widths used by the stats report.
#[derive(Debug, Clone, Copy)]
pub struct StatsWidths {
    /// Current-usage meter.
    pub meter: usize,
    /// Daily/weekly bars.
    pub bars: usize,
}

// ============================================================================
// Free helpers
// ============================================================================

/// `filled` full cells followed by empty cells up to `width`.
pub fn bar_string(filled: usize, width: usize) -> String {
    let filled = filled.min(width);
    format!(
        "{}{}",
        BAR_FULL.to_string().repeat(filled),
        BAR_EMPTY.to_string().repeat(width - filled)
    )
}

fn section(title: &str) -> String {
    format!("\n{title}\n{}", "─".repeat(21))
}

fn overall_lines(stats: &OverallStats) -> Vec<String> {
    let mut lines = vec![format!("  Total snapshots: {}", stats.total_snapshots)];
    if let Some(first) = stats.first_at {
        lines.push(format!("  First snapshot:  {}", local_time(first)));
    }
    if let Some(last) = stats.last_at {
        lines.push(format!("  Latest snapshot: {}", local_time(last)));
    }
    if let Some(avg) = stats.avg_daily {
        lines.push(format!("  Avg daily:       {avg:.1} requests/day"));
    }
    lines
}

fn percent_text(pct: Option<f64>) -> String {
    pct.map_or_else(|| "n/a".to_string(), |p| format!("{p:.1}%"))
}

fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

/// `in 2d 3h`, `in 45m`, or `overdue`.
pub(super) fn format_minutes(minutes: i64) -> String {
    if minutes <= 0 {
        return "overdue".to_string();
    }
    let days = minutes / (24 * 60);
    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;
    if days > 0 {
        format!("in {days}d {hours}h")
    } else if hours > 0 {
        format!("in {hours}h {mins}m")
    } else {
        format!("in {mins}m")
    }
}
