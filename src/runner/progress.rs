//! Coarse progress reporting for long trace files.
//!
//! Purely advisory: progress lines go to the log and never influence results.

use crate::utils::config::PROGRESS_LINE_INTERVAL;
use log::info;

/// Reports how far a worker has read into its source
#[derive(Debug, Clone)]
pub struct Progress {
    source: String,
    total_bytes: u64,
    enabled: bool,
}

impl Progress {
    pub fn new(source: impl Into<String>, total_bytes: u64) -> Self {
        Self {
            source: source.into(),
            total_bytes,
            enabled: true,
        }
    }

    /// A reporter that never logs
    pub fn disabled() -> Self {
        Self {
            source: String::new(),
            total_bytes: 0,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Called before line `line_index` is processed, with the bytes consumed so far
    pub fn observe(&self, line_index: u64, bytes_processed: u64) {
        if self.enabled && line_index % PROGRESS_LINE_INTERVAL == 0 {
            info!(
                "{}: {:.3}",
                self.source,
                fraction(bytes_processed, self.total_bytes)
            );
        }
    }
}

/// Share of `total` already processed, clamped to `[0, 1]`
pub fn fraction(processed: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (processed as f64 / total as f64).min(1.0)
}
