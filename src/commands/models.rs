use crate::runner::RunConfig;
use crate::utils::config::{DEFAULT_BUCKET_WIDTH_SECS, DEFAULT_TOP_CALLS};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// strace log files to read
    pub strace_files: Vec<PathBuf>,

    /// Bucket width in seconds
    pub bucket_width: f64,

    /// Output path for JSON statistics (None = stdout)
    pub output_json: Option<PathBuf>,

    /// Output path for the CSV table (optional)
    pub output_csv: Option<PathBuf>,

    /// Worker thread limit (None = available parallelism)
    pub workers: Option<usize>,

    /// Log per-file read progress
    pub report_progress: bool,

    /// Print text summary to stderr
    pub print_summary: bool,

    /// Number of calls in the text summary
    pub top_calls: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            strace_files: Vec::new(),
            bucket_width: DEFAULT_BUCKET_WIDTH_SECS,
            output_json: None,
            output_csv: None,
            workers: None,
            report_progress: true,
            print_summary: false,
            top_calls: DEFAULT_TOP_CALLS,
        }
    }
}

impl AnalyzeArgs {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            bucket_width: self.bucket_width,
            workers: self.workers,
            report_progress: self.report_progress,
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Statistics JSON written by analyze
    pub stats_file: PathBuf,

    /// Bucket width the statistics were built with
    pub bucket_width: f64,

    /// Output path for the CSV table (None = stdout)
    pub output_csv: Option<PathBuf>,
}

impl Default for ExportArgs {
    fn default() -> Self {
        Self {
            stats_file: PathBuf::from("stats.json"),
            bucket_width: DEFAULT_BUCKET_WIDTH_SECS,
            output_csv: None,
        }
    }
}
