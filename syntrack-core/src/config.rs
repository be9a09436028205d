//! Engine configuration.
//!
//! Default windows, bucket counts and chart dimensions live here as plain
//! values passed to the analytics facade and chart mappers. Nothing reads
//! ambient state.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Bucket Zone
// ============================================================================

/// Time zone used to assign snapshots to calendar days and weeks.
///
/// Defaults to UTC so the same database yields the same buckets on every
/// machine. Serialized as `"utc"`, `"local"` or an offset like `"+02:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BucketZone {
    /// Coordinated Universal Time.
    #[default]
    Utc,
    /// The zone of the machine running the query.
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl BucketZone {
    /// Returns the calendar date of `at` in this zone.
    pub fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Utc => at.date_naive(),
            Self::Local => at.with_timezone(&chrono::Local).date_naive(),
            Self::Fixed(offset) => at.with_timezone(offset).date_naive(),
        }
    }
}

impl fmt::Display for BucketZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => write!(f, "utc"),
            Self::Local => write!(f, "local"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for BucketZone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "utc" | "z" => return Ok(Self::Utc),
            "local" => return Ok(Self::Local),
            _ => {}
        }

        let invalid = || CoreError::InvalidData(format!("unknown time zone: {trimmed}"));

        let (sign, rest) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::Fixed)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for BucketZone {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BucketZone> for String {
    fn from(zone: BucketZone) -> Self {
        zone.to_string()
    }
}

// ============================================================================
// Analytics Configuration
// ============================================================================

/// Longest accepted burn-rate window: one leap year.
pub const MAX_BURN_WINDOW_HOURS: u32 = 24 * 366;

/// Windows and bucket counts used by the analytics facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Trailing window for the burn rate, in hours.
    pub burn_window_hours: u32,
    /// Days of raw history shown by history and chart views.
    pub history_days: u32,
    /// Number of daily buckets in summary views.
    pub daily_buckets: usize,
    /// Number of weekly buckets in summary views.
    pub weekly_buckets: usize,
    /// Number of weekly buckets in the weekly bar chart.
    pub chart_weeks: usize,
    /// Zone used for day and week boundaries.
    pub zone: BucketZone,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            burn_window_hours: 24,
            history_days: 7,
            daily_buckets: 7,
            weekly_buckets: 4,
            chart_weeks: 8,
            zone: BucketZone::Utc,
        }
    }
}

// ============================================================================
// Chart Configuration
// ============================================================================

/// Dimensions for every chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// ASCII grid width in cells.
    pub grid_width: usize,
    /// ASCII grid height in cells.
    pub grid_height: usize,
    /// Maximum sparkline width in characters.
    pub sparkline_width: usize,
    /// SVG canvas width in pixels.
    pub svg_width: f64,
    /// SVG canvas height in pixels.
    pub svg_height: f64,
    /// SVG padding around the plot area in pixels.
    pub svg_padding: f64,
    /// Width of consumption bar charts.
    pub bar_width: usize,
    /// Width of inline bars in the stats view.
    pub stats_bar_width: usize,
    /// Width of the current-usage meter.
    pub meter_width: usize,
    /// Approximate number of date labels along the x axis.
    pub label_count: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            grid_width: 60,
            grid_height: 15,
            sparkline_width: 40,
            svg_width: 800.0,
            svg_height: 400.0,
            svg_padding: 60.0,
            bar_width: 30,
            stats_bar_width: 20,
            meter_width: 30,
            label_count: 5,
        }
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Analytics windows.
    pub analytics: AnalyticsConfig,
    /// Chart dimensions.
    pub chart: ChartConfig,
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` when a window or dimension is zero
    /// or the SVG padding leaves no room for the plot. The burn window is
    /// also capped at [`MAX_BURN_WINDOW_HOURS`].
    pub fn validate(&self) -> Result<(), CoreError> {
        let a = &self.analytics;
        let c = &self.chart;

        if a.burn_window_hours == 0 {
            return Err(CoreError::InvalidConfig(
                "burn_window_hours must be greater than 0".to_string(),
            ));
        }
        if a.burn_window_hours > MAX_BURN_WINDOW_HOURS {
            return Err(CoreError::InvalidConfig(format!(
                "burn_window_hours must be at most {MAX_BURN_WINDOW_HOURS}, got {}",
                a.burn_window_hours
            )));
        }
        if c.grid_width < 2 || c.grid_height < 2 {
            return Err(CoreError::InvalidConfig(
                "grid must be at least 2x2 cells".to_string(),
            ));
        }
        if c.sparkline_width == 0 || c.bar_width == 0 || c.stats_bar_width == 0 {
            return Err(CoreError::InvalidConfig(
                "chart widths must be greater than 0".to_string(),
            ));
        }
        if c.svg_padding * 2.0 >= c.svg_width || c.svg_padding * 2.0 >= c.svg_height {
            return Err(CoreError::InvalidConfig(format!(
                "svg padding {} leaves no plot area in {}x{}",
                c.svg_padding, c.svg_width, c.svg_height
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
