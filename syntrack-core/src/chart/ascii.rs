//! Character grid renderer.

use serde::Serialize;

use super::normalize::NormalizedSeries;

/// Cell marker for the "used" series.
pub const USED_MARK: char = '#';
/// Cell marker for the "leftover" series.
pub const LEFTOVER_MARK: char = '.';
const EMPTY: char = ' ';

/// A `width × height` character grid, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsciiGrid {
    width: usize,
    height: usize,
    max_value: f64,
    rows: Vec<Vec<char>>,
}

impl AsciiGrid {
    /// Plots both series of `series` into a new grid.
    ///
    /// For each point the "used" mark is written before the "leftover" mark
    /// and a cell keeps whichever mark reached it first.
    pub fn render(series: &NormalizedSeries, width: usize, height: usize) -> Self {
        let mut rows = vec![vec![EMPTY; width]; height];

        if width > 0 && height > 0 {
            for point in series.points() {
                let col = cell_index(point.x, width);
                for (yf, mark) in [(point.used, USED_MARK), (point.leftover, LEFTOVER_MARK)] {
                    let row = cell_index(yf, height);
                    let cell = &mut rows[row][col];
                    if *cell == EMPTY {
                        *cell = mark;
                    }
                }
            }
        }

        Self {
            width,
            height,
            max_value: series.max_value(),
            rows,
        }
    }

    /// Grid width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value represented by the top row.
    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Character at (`col`, `row`), if inside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Each row as a string.
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.iter().collect()).collect()
    }

    /// Column for a horizontal fraction, as used for plotted points.
    pub fn column_of(&self, x: f64) -> usize {
        if self.width == 0 {
            0
        } else {
            cell_index(x, self.width)
        }
    }
}

/// `trunc(fraction × (cells − 1))` clamped into `0..cells`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_index(fraction: f64, cells: usize) -> usize {
    let last = cells - 1;
    let raw = (fraction * last as f64).trunc();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else if raw >= last as f64 {
        last
    } else {
        raw as usize
    }
}
