//! Parallel processing of trace sources.

pub mod parallel;
pub mod progress;

pub use parallel::{
    process_file, process_reader, run_parallel, RunConfig, RunReport, SourcePass, SourceStats,
    SourceSummary,
};
pub use progress::Progress;
