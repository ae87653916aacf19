//! Merge, rolling-window aggregation, and percentile thresholds
//!
//! Joins the per-source series into unified records, reduces them into
//! daily summaries over a trailing window, and derives the cutoffs that
//! mark a day as extreme.

pub mod aggregator;
pub mod merge;
pub mod thresholds;

pub use aggregator::*;
pub use merge::*;
pub use thresholds::*;

/// Trailing window length in calendar days
pub const DEFAULT_WINDOW_DAYS: u32 = 28;

/// Percentile used for the extreme cutoffs
pub const DEFAULT_PERCENTILE: f64 = 20.0;
