//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use syntrack_core::{
    Bar, BurnRateReport, CurrentStatus, DailyBucket, DaySummary, NormalizedSeries, OverallStats,
    Snapshot, Sparkline, WeekSummary, WeeklyBucket,
};

// ============================================================================
// Output Types
// ============================================================================

/// One row of `history` / `query history`.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    #[serde(serialize_with = "serialize_datetime")]
    pub timestamp: DateTime<Utc>,
    pub limit: i64,
    pub used: i64,
    pub leftover: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_percent: Option<f64>,
}

impl From<&Snapshot> for HistoryEntry {
    fn from(s: &Snapshot) -> Self {
        Self {
            timestamp: s.collected_at,
            limit: s.subscription_limit,
            used: s.requests_used,
            leftover: s.leftover(),
            usage_percent: s.usage_percent(),
        }
    }
}

/// Everything the `stats` command shows.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub current: CurrentStatus,
    pub burn_rate: BurnRateReport,
    pub daily: Vec<DailyBucket>,
    pub weekly: Vec<WeeklyBucket>,
    pub overall: OverallStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Sparkline>,
}

/// `chart --type usage` in JSON form.
#[derive(Debug, Serialize)]
pub struct UsageChartOutput<'a> {
    pub series: &'a NormalizedSeries,
    pub grid: Vec<String>,
}

/// `chart --type daily|weekly` in JSON form.
#[derive(Debug, Serialize)]
pub struct BarChartOutput<'a, K: Serialize> {
    pub width: usize,
    pub bars: &'a [Bar<syntrack_core::UsageBucket<K>>],
}

/// Payload of every `query` type.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Current(Option<CurrentStatus>),
    Day(DaySummary),
    Week(WeekSummary),
    BurnRate(BurnRateReport),
    History(Vec<HistoryEntry>),
    Daily(Vec<DailyBucket>),
    Weekly(Vec<WeeklyBucket>),
}

/// A message in place of data (no snapshots yet, too few for a chart).
#[derive(Debug, Serialize)]
pub struct NoticeOutput {
    pub notice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<usize>,
}

/// `config path` output.
#[derive(Debug, Serialize)]
pub struct PathsOutput {
    pub config_dir: String,
    pub settings_file: String,
    pub database: String,
}

/// `svg --output` confirmation.
#[derive(Debug, Serialize)]
pub struct WrittenOutput {
    pub path: String,
    pub bytes: usize,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats snapshots as history entries, oldest first.
    pub fn format_history(&self, snapshots: &[Snapshot]) -> Result<String> {
        let entries: Vec<HistoryEntry> = snapshots.iter().map(HistoryEntry::from).collect();
        self.format(&entries)
    }

    /// Formats a notice.
    pub fn format_notice(&self, notice: &str, available: Option<usize>) -> Result<String> {
        self.format(&NoticeOutput {
            notice: notice.to_string(),
            available,
        })
    }
}
