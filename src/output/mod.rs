//! Output writers for aggregated statistics.
//!
//! This module handles writing data in various formats:
//! - JSON statistics (the bucket mapping itself)
//! - CSV tables of mean call duration per bucket
//! - Text summaries

pub mod csv;
pub mod json;
pub mod text;

// Re-export main functions
pub use csv::{export, write_csv, SummaryRow, SummaryTable};
pub use json::{read_stats, stats_from_str, stats_to_string, write_stats, write_stats_to};
pub use text::render_summary;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create missing parent directories of an output file
///
/// **Private** - shared by the file writers
fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
