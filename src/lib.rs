//! strace-buckets
//!
//! Time-bucketed statistics from `strace -ttt -T` logs: per-interval signal
//! counts and per-call total duration and call count, computed over many
//! files in parallel and merged into one summary.
//!
//! ## Getting Started
//!
//! ```bash
//! strace -f -ttt -T -o trace.log ./my-program
//! strace-buckets analyze -f trace.log -o stats.json --csv stats.csv
//! ```
//!
//! As a library:
//!
//! ```no_run
//! use strace_buckets::runner::{run_parallel, RunConfig};
//! use std::path::PathBuf;
//!
//! let report = run_parallel(&[PathBuf::from("trace.log")], &RunConfig::default())?;
//! println!("{} buckets", report.state.len());
//! # Ok::<(), strace_buckets::utils::RunError>(())
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod runner;
pub mod utils;
