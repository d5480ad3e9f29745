//! Share-nothing parallel ingestion.
//!
//! Each source is read by one worker into its own [`Accumulator`]. Workers
//! never touch each other's state. After every worker has been joined, the
//! partial states are folded with the merger on the calling thread.

use super::progress::Progress;
use crate::aggregator::{merge_all, validate_bucket_width, Accumulator, AggregateState};
use crate::parser::parse_line;
use crate::utils::config::DEFAULT_BUCKET_WIDTH_SECS;
use crate::utils::error::{ConfigError, RunError, SourceError};
use log::{debug, info, warn};
use std::any::Any;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

/// Settings shared by every worker of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Bucket width in seconds, identical for all workers
    pub bucket_width: f64,

    /// Worker thread limit (None = available parallelism)
    pub workers: Option<usize>,

    /// Log read progress while processing
    pub report_progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bucket_width: DEFAULT_BUCKET_WIDTH_SECS,
            workers: None,
            report_progress: true,
        }
    }
}

impl RunConfig {
    /// Check the configuration before any work begins
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_bucket_width(self.bucket_width)?;
        if self.workers == Some(0) {
            return Err(ConfigError::InvalidWorkerCount);
        }
        Ok(())
    }

    /// Number of threads to start for `source_count` sources
    fn worker_count(&self, source_count: usize) -> usize {
        let limit = self.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        });
        limit.min(source_count).max(1)
    }
}

/// Line counters for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceStats {
    /// Lines read, parsable or not
    pub lines: u64,

    /// Lines that produced a record
    pub records: u64,

    /// Bytes read
    pub bytes: u64,
}

impl SourceStats {
    /// Lines that matched neither grammar
    pub fn skipped(&self) -> u64 {
        self.lines - self.records
    }
}

/// Result of one worker pass over one source
#[derive(Debug, Clone)]
pub struct SourcePass {
    pub state: AggregateState,
    pub stats: SourceStats,
}

/// Per-source summary kept in the run report
#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub path: PathBuf,
    pub stats: SourceStats,
}

/// Merged result of a whole run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: AggregateState,
    /// One entry per input source, in input order
    pub sources: Vec<SourceSummary>,
}

impl RunReport {
    pub fn total_lines(&self) -> u64 {
        self.sources.iter().map(|s| s.stats.lines).sum()
    }

    pub fn total_skipped(&self) -> u64 {
        self.sources.iter().map(|s| s.stats.skipped()).sum()
    }
}

/// Feed every line of `reader` through the parser into `accumulator`
///
/// **Public** - one worker pass; `source` is only used for errors and logs
///
/// Lines are read as bytes and decoded lossily, so invalid UTF-8 can only make
/// a line unparsable, never fail the pass.
///
/// # Errors
/// * `SourceError::Read` - the reader failed part way through
pub fn process_reader<R: BufRead>(
    mut reader: R,
    source: &Path,
    mut accumulator: Accumulator,
    progress: &Progress,
) -> Result<SourcePass, SourceError> {
    let mut stats = SourceStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source_err| SourceError::Read {
                path: source.to_path_buf(),
                source: source_err,
            })?;
        if read == 0 {
            break;
        }

        progress.observe(stats.lines, stats.bytes);

        let line = String::from_utf8_lossy(&buf);
        let record = parse_line(&line);
        if record.is_some() {
            stats.records += 1;
        }
        accumulator.record(record.as_ref());

        stats.lines += 1;
        stats.bytes += read as u64;
    }

    if stats.lines == 0 {
        warn!("{}: source is empty", source.display());
    }
    debug!(
        "{}: {} lines, {} records, {} skipped",
        source.display(),
        stats.lines,
        stats.records,
        stats.skipped()
    );

    Ok(SourcePass {
        state: accumulator.into_state(),
        stats,
    })
}

/// Open `path` and run one worker pass over it
///
/// **Public** - used by run_parallel for each source
///
/// # Errors
/// * `RunError::Config` - invalid bucket width
/// * `RunError::Source` - the file cannot be opened or read
pub fn process_file(path: &Path, config: &RunConfig) -> Result<SourcePass, RunError> {
    let accumulator = Accumulator::new(config.bucket_width)?;

    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let progress = if config.report_progress {
        let total_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);
        Progress::new(path.display().to_string(), total_bytes)
    } else {
        Progress::disabled()
    };

    Ok(process_reader(
        BufReader::new(file),
        path,
        accumulator,
        &progress,
    )?)
}

/// Process every source on a bounded set of worker threads and merge the results
///
/// **Public** - main entry point for a run
///
/// Sources are handed out through a shared cursor, so a worker that finishes a
/// small file picks up the next one. Once any source fails, workers stop taking
/// new sources and the run returns that error; partial results are discarded.
///
/// # Errors
/// * `RunError::Config` - invalid configuration or no sources (checked before any work)
/// * `RunError::Source` - any source failed to open or read
/// * `RunError::WorkerPanicked` - a worker thread panicked
pub fn run_parallel(sources: &[PathBuf], config: &RunConfig) -> Result<RunReport, RunError> {
    config.validate()?;
    if sources.is_empty() {
        return Err(ConfigError::NoSources.into());
    }

    let start_time = Instant::now();
    let workers = config.worker_count(sources.len());
    info!(
        "Processing {} source(s) on {} worker(s), bucket width {}s",
        sources.len(),
        workers,
        config.bucket_width
    );

    let cursor = AtomicUsize::new(0);
    let failed = AtomicBool::new(false);

    let outcomes: Vec<Result<Vec<(usize, SourcePass)>, RunError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let cursor = &cursor;
                let failed = &failed;
                scope.spawn(move || {
                    let mut passes = Vec::new();
                    while !failed.load(Ordering::Relaxed) {
                        let index = cursor.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = sources.get(index) else {
                            break;
                        };
                        debug!("Worker {} reading {}", worker, path.display());
                        match process_file(path, config) {
                            Ok(pass) => passes.push((index, pass)),
                            Err(e) => {
                                failed.store(true, Ordering::Relaxed);
                                return Err(e);
                            }
                        }
                    }
                    Ok(passes)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(outcome) => outcome,
                Err(payload) => Err(RunError::WorkerPanicked(panic_message(payload.as_ref()))),
            })
            .collect()
    });

    let mut passes = Vec::with_capacity(sources.len());
    for outcome in outcomes {
        passes.extend(outcome?);
    }
    passes.sort_by_key(|(index, _)| *index);

    let mut summaries = Vec::with_capacity(passes.len());
    let mut states = Vec::with_capacity(passes.len());
    for (index, pass) in passes {
        summaries.push(SourceSummary {
            path: sources[index].clone(),
            stats: pass.stats,
        });
        states.push(pass.state);
    }

    let state = merge_all(config.bucket_width, states)?;

    info!(
        "Aggregated {} bucket(s) from {} source(s) in {:.2}s",
        state.len(),
        summaries.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(RunReport {
        state,
        sources: summaries,
    })
}

/// Best-effort text of a panic payload
///
/// **Private** - internal helper for run_parallel
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
