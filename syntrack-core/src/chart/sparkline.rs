//! Block-character sparkline.

use serde::Serialize;

use super::normalize::NormalizedSeries;

/// Nine levels, empty to full.
pub const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One sparkline row per series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sparkline {
    /// Requests used.
    pub used: String,
    /// Requests left.
    pub leftover: String,
}

impl Sparkline {
    /// Renders both series at most `width` columns wide.
    ///
    /// With more points than columns the series is resampled, column `c`
    /// showing point `c × (n − 1) / (width − 1)`. Otherwise each point gets a
    /// column.
    pub fn render(series: &NormalizedSeries, width: usize) -> Self {
        let indices = sample_indices(series.len(), width);
        let points = series.points();

        let used = indices
            .iter()
            .map(|&i| level_for(1.0 - points[i].used))
            .collect();
        let leftover = indices
            .iter()
            .map(|&i| level_for(1.0 - points[i].leftover))
            .collect();

        Self { used, leftover }
    }

    /// Number of columns rendered.
    pub fn width(&self) -> usize {
        self.used.chars().count()
    }
}

/// Point index shown in each column.
fn sample_indices(n: usize, width: usize) -> Vec<usize> {
    if width == 0 || n == 0 {
        return Vec::new();
    }
    if n <= width {
        return (0..n).collect();
    }
    if width == 1 {
        return vec![0];
    }
    (0..width).map(|c| c * (n - 1) / (width - 1)).collect()
}

/// Level glyph for a value fraction, `round(fraction × 8)` after clamping.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn level_for(fraction: f64) -> char {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let top = (LEVELS.len() - 1) as f64;
    LEVELS[(fraction * top).round() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Snapshot, SnapshotId};
    use chrono::{Duration, TimeZone, Utc};

    fn normalized(used: &[i64]) -> NormalizedSeries {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let rows: Vec<Snapshot> = used
            .iter()
            .enumerate()
            .map(|(i, &u)| Snapshot {
                id: SnapshotId(i as i64 + 1),
                collected_at: t0 + Duration::hours(i as i64),
                subscription_limit: 80,
                requests_used: u,
                renews_at: None,
            })
            .collect();
        NormalizedSeries::from_snapshots(&rows).unwrap()
    }

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0.0), ' ');
        assert_eq!(level_for(1.0), '█');
        assert_eq!(level_for(0.5), '▄');
        // 0.06 * 8 = 0.48 rounds down, 0.07 * 8 = 0.56 rounds up
        assert_eq!(level_for(0.06), ' ');
        assert_eq!(level_for(0.07), '▁');
    }

    #[test]
    fn test_fraction_is_clamped() {
        assert_eq!(level_for(-0.5), ' ');
        assert_eq!(level_for(7.0), '█');
        assert_eq!(level_for(f64::NAN), ' ');
    }

    #[test]
    fn test_one_column_per_point_when_short() {
        let spark = Sparkline::render(&normalized(&[0, 40, 80]), 40);
        assert_eq!(spark.used, " ▄█");
        assert_eq!(spark.leftover, "█▄ ");
        assert_eq!(spark.width(), 3);
    }

    #[test]
    fn test_resampled_when_long() {
        let used: Vec<i64> = (0..100).collect();
        let spark = Sparkline::render(&normalized(&used), 40);
        assert_eq!(spark.width(), 40);
        assert_eq!(spark.used.chars().next(), Some(' '));
    }

    #[test]
    fn test_sample_indices_cover_ends() {
        let idx = sample_indices(100, 40);
        assert_eq!(idx.len(), 40);
        assert_eq!(idx[0], 0);
        assert_eq!(idx[39], 99);
        assert!(idx.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sample_indices_degenerate_width() {
        assert!(sample_indices(10, 0).is_empty());
        assert_eq!(sample_indices(10, 1), vec![0]);
    }
}
