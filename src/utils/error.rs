//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Note that an unparsable trace line is not an error anywhere in this crate:
//! the parser returns `None` and the line is skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating run configuration, before any work starts
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Bucket width must be a positive, finite number of seconds (got {0})")]
    InvalidBucketWidth(f64),

    #[error("No input sources given")]
    NoSources,

    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,
}

/// Errors that can occur while reading one trace source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when combining aggregation states
#[derive(Error, Debug, PartialEq)]
pub enum MergeError {
    #[error("Cannot merge states with different bucket widths ({expected}s vs {found}s)")]
    BucketWidthMismatch { expected: f64, found: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that abort a whole parallel run
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Invalid bucket key: {0}")]
    InvalidBucketKey(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
