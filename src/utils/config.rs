//! Configuration and constants for the analyzer.

/// Default width of one aggregation bucket, in seconds
pub const DEFAULT_BUCKET_WIDTH_SECS: f64 = 300.0;

/// A progress line is logged every this many input lines (starting at line 0)
pub const PROGRESS_LINE_INTERVAL: u64 = 100_000;

/// Number of calls listed in the text summary by default
pub const DEFAULT_TOP_CALLS: usize = 10;
