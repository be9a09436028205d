//! Output formatting for CLI.

mod json;
mod text;

pub use json::{
    BarChartOutput, HistoryEntry, JsonFormatter, PathsOutput, QueryOutput, StatsReport,
    UsageChartOutput, WrittenOutput,
};
pub use text::{StatsWidths, TextFormatter};
#[cfg(test)]
mod tests;
