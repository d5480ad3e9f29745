//! Aggregation of parsed records into time buckets.
//!
//! This module provides:
//! - Bucket keys and per-bucket counters
//! - The per-worker accumulator
//! - The merge step that combines partial results

pub mod accumulator;
pub mod bucket;
pub mod merge;
pub mod state;

// Re-export main types and functions
pub use accumulator::Accumulator;
pub use bucket::{bucket_key, Bucket, BucketKey, CallStats};
pub use merge::{merge, merge_all};
pub use state::{validate_bucket_width, AggregateState};
