//! Chart geometry.
//!
//! Every renderer starts from one [`NormalizedSeries`]: x is the point's index
//! as a fraction of the series length, y is `1 - value / max_value` for the
//! "used" and "leftover" series. The renderers only quantize or scale those
//! fractions, so they all show the same proportions.
//!
//! ## Submodules
//!
//! - [`normalize`] - Shared normalization and axis labels
//! - [`ascii`] - Character grid
//! - [`sparkline`] - Block-character sparkline
//! - [`svg`] - Pixel coordinates and SVG markup
//! - [`bars`] - Horizontal bar lengths

pub mod ascii;
pub mod bars;
pub mod normalize;
pub mod sparkline;
pub mod svg;

pub use ascii::AsciiGrid;
pub use bars::{Bar, bar_length, normalized_bars};
pub use normalize::{AxisLabel, InsufficientData, NormalizedPoint, NormalizedSeries};
pub use sparkline::Sparkline;
pub use svg::{ChartPoint, SvgChart};
