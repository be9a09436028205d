//! Domain models for Syntrack.
//!
//! ## Submodules
//!
//! - [`snapshot`] - Stored observations and inbound samples
//! - [`bucket`] - Derived day/week buckets and the ISO week key

mod bucket;
mod snapshot;

pub use bucket::{DailyBucket, UsageBucket, WeekKey, WeeklyBucket};
pub use snapshot::{QuotaSample, Snapshot, SnapshotId};
