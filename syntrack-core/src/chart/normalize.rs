//! Shared normalization for every chart renderer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::models::Snapshot;

/// Minimum number of points a chart needs.
pub const MIN_CHART_POINTS: usize = 2;

/// Date format used for axis labels.
pub const AXIS_DATE_FORMAT: &str = "%m/%d";

// ============================================================================
// Insufficient Data
// ============================================================================

/// A chart was requested for fewer than [`MIN_CHART_POINTS`] snapshots.
///
/// This is an expected state before enough collections have happened, not a
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsufficientData {
    /// Points needed.
    pub required: usize,
    /// Points available.
    pub available: usize,
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "need at least {} snapshots for a chart, have {}",
            self.required, self.available
        )
    }
}

// ============================================================================
// Normalized Series
// ============================================================================

/// One snapshot in normalized plotting space.
///
/// All coordinates are fractions. `x` is in `[0, 1]`; `used` and `leftover`
/// are `1 - value / max_value` and may leave `[0, 1]` (a negative leftover
/// plots below the axis, a leftover above the scale basis plots above the
/// top). Renderers clamp as needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    /// Horizontal position, `i / (n - 1)`.
    pub x: f64,
    /// Vertical position of the "used" series, top-down.
    pub used: f64,
    /// Vertical position of the "leftover" series, top-down.
    pub leftover: f64,
    /// When the snapshot was taken.
    pub collected_at: DateTime<Utc>,
}

/// A snapshot series normalized against a single scale basis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    max_value: f64,
    points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    /// Normalizes `snapshots` in the order given.
    ///
    /// The scale basis is the larger of the *first* snapshot's limit and the
    /// highest `requests_used` in the series. A basis of zero or less is
    /// replaced by 1.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientData`] for fewer than two snapshots.
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Result<Self, InsufficientData> {
        let n = snapshots.len();
        if n < MIN_CHART_POINTS {
            return Err(InsufficientData {
                required: MIN_CHART_POINTS,
                available: n,
            });
        }

        let max_value = scale_basis(snapshots);
        let points = snapshots
            .iter()
            .enumerate()
            .map(|(i, s)| NormalizedPoint {
                x: x_fraction(i, n),
                used: y_fraction(s.requests_used, max_value),
                leftover: y_fraction(s.leftover(), max_value),
                collected_at: s.collected_at,
            })
            .collect();

        Ok(Self { max_value, points })
    }

    /// The scale basis every y fraction was computed against.
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Normalized points, in input order.
    pub fn points(&self) -> &[NormalizedPoint] {
        &self.points
    }

    /// Number of points (always at least two).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a series has at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last timestamps.
    pub fn span(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let first = self.points.first().map(|p| p.collected_at);
        let last = self.points.last().map(|p| p.collected_at);
        match (first, last) {
            (Some(first), Some(last)) => (first, last),
            _ => (DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Date labels every `max(n / label_count, 1)` points.
    pub fn axis_labels(&self, label_count: usize) -> Vec<AxisLabel> {
        let stride = label_stride(self.len(), label_count);
        self.points
            .iter()
            .enumerate()
            .step_by(stride)
            .map(|(index, p)| AxisLabel {
                index,
                x: p.x,
                text: p.collected_at.format(AXIS_DATE_FORMAT).to_string(),
            })
            .collect()
    }
}

/// A date label placed at a point's x fraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    /// Index of the labelled point.
    pub index: usize,
    /// Horizontal fraction of the labelled point.
    pub x: f64,
    /// Label text (`MM/DD`).
    pub text: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// `max(first.subscription_limit, max(requests_used))`, floored at 1.
fn scale_basis(snapshots: &[Snapshot]) -> f64 {
    let first_limit = snapshots.first().map_or(0, |s| s.subscription_limit);
    let max = snapshots
        .iter()
        .map(|s| s.requests_used)
        .fold(first_limit, i64::max);
    if max <= 0 { 1.0 } else { max as f64 }
}

/// `i / (n - 1)`; callers guarantee `n >= 2`.
pub fn x_fraction(i: usize, n: usize) -> f64 {
    i as f64 / (n - 1) as f64
}

/// `1 - value / max_value`.
pub fn y_fraction(value: i64, max_value: f64) -> f64 {
    1.0 - value as f64 / max_value
}

/// Label stride for `n` points: `n / label_count`, at least 1.
pub fn label_stride(n: usize, label_count: usize) -> usize {
    n.checked_div(label_count).unwrap_or(n).max(1)
}

// ============================================================================
// Tests
// ============================================================================
