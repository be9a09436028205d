//! Horizontal bar lengths.

use serde::Serialize;

/// An item paired with its bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar<T> {
    /// The source item.
    pub item: T,
    /// Value extracted from the item.
    pub value: i64,
    /// Filled cells, `0..=width`.
    pub filled: usize,
}

impl<T> Bar<T> {
    /// Empty cells for a bar of `width`.
    pub fn empty(&self, width: usize) -> usize {
        width.saturating_sub(self.filled)
    }
}

/// `trunc(value / max(max_value, 1) × width)`, with negative values as 0.
///
/// Values above `max_value` fill the whole bar.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn bar_length(value: i64, max_value: i64, width: usize) -> usize {
    let value = value.max(0) as f64;
    let max_value = max_value.max(1) as f64;
    let len = (value / max_value * width as f64).trunc();
    if len >= width as f64 { width } else { len as usize }
}

/// Bars for `items` scaled to the largest extracted value.
pub fn normalized_bars<T, I, F>(items: I, width: usize, value_of: F) -> Vec<Bar<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> i64,
{
    let items: Vec<(T, i64)> = items
        .into_iter()
        .map(|item| {
            let value = value_of(&item);
            (item, value)
        })
        .collect();
    let max_value = items.iter().map(|(_, v)| *v).max().unwrap_or(0);

    items
        .into_iter()
        .map(|(item, value)| Bar {
            filled: bar_length(value, max_value, width),
            item,
            value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_length() {
        assert_eq!(bar_length(50, 100, 30), 15);
        assert_eq!(bar_length(100, 100, 30), 30);
        // 1/3 * 20 = 6.67 truncates
        assert_eq!(bar_length(1, 3, 20), 6);
    }

    #[test]
    fn test_zero_max_does_not_divide_by_zero() {
        assert_eq!(bar_length(0, 0, 30), 0);
        assert_eq!(bar_length(5, 0, 30), 30);
    }

    #[test]
    fn test_negative_value_is_empty() {
        assert_eq!(bar_length(-10, 100, 30), 0);
    }

    #[test]
    fn test_normalized_bars_scale_to_max() {
        let days = vec![("mon", 120), ("tue", 60), ("wed", 0)];
        let bars = normalized_bars(days, 30, |(_, v)| *v);
        let filled: Vec<usize> = bars.iter().map(|b| b.filled).collect();
        assert_eq!(filled, vec![30, 15, 0]);
        assert_eq!(bars[1].item.0, "tue");
        assert_eq!(bars[1].empty(30), 15);
    }

    #[test]
    fn test_normalized_bars_all_zero() {
        let bars = normalized_bars([0_i64, 0], 10, |v| *v);
        assert!(bars.iter().all(|b| b.filled == 0));
    }
}
