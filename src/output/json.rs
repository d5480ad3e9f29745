//! JSON statistics writer and reader.
//!
//! The document is an object keyed by bucket start label:
//!
//! ```json
//! { "0.0": { "events": { "SIGCHLD": 1 },
//!            "calls": { "open": { "total_duration": 0.002, "count": 1 } } } }
//! ```

use crate::aggregator::{AggregateState, Bucket, BucketKey};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write statistics to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_stats(state: &AggregateState, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing statistics to: {}", output_path.display());

    super::validate_path(output_path)?;
    super::ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    write_stats_to(state, BufWriter::new(file))?;

    info!(
        "Statistics written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Write statistics as compact JSON to any writer (e.g. stdout)
pub fn write_stats_to<W: Write>(state: &AggregateState, mut writer: W) -> Result<(), OutputError> {
    serde_json::to_writer(&mut writer, state).map_err(OutputError::SerializationFailed)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Serialize statistics to a pretty JSON string
pub fn stats_to_string(state: &AggregateState) -> Result<String, OutputError> {
    serde_json::to_string_pretty(state).map_err(OutputError::SerializationFailed)
}

/// Read statistics back from a JSON file
///
/// **Public** - used by the export and validate commands
///
/// `bucket_width` must be the width the file was produced with; every key must
/// be a multiple of it.
///
/// # Errors
/// * `OutputError::ReadFailed` - File open or read error
/// * `OutputError::SerializationFailed` - JSON parse error
/// * `OutputError::InvalidBucketKey` - a key is not a number aligned to the width
pub fn read_stats(input_path: impl AsRef<Path>, bucket_width: f64) -> Result<AggregateState, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading statistics from: {}", input_path.display());

    let file = File::open(input_path).map_err(|source| OutputError::ReadFailed {
        path: input_path.to_path_buf(),
        source,
    })?;
    let raw: BTreeMap<String, Bucket> = serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            OutputError::ReadFailed {
                path: input_path.to_path_buf(),
                source: e.into(),
            }
        } else {
            OutputError::SerializationFailed(e)
        }
    })?;

    let state = from_labeled(raw, bucket_width)?;
    debug!("Statistics loaded: {} buckets", state.len());

    Ok(state)
}

/// Parse statistics from a JSON string
pub fn stats_from_str(json: &str, bucket_width: f64) -> Result<AggregateState, OutputError> {
    let raw: BTreeMap<String, Bucket> =
        serde_json::from_str(json).map_err(OutputError::SerializationFailed)?;
    from_labeled(raw, bucket_width)
}

/// Rebuild a state from label-keyed buckets
///
/// **Private** - shared by read_stats and stats_from_str
fn from_labeled(raw: BTreeMap<String, Bucket>, bucket_width: f64) -> Result<AggregateState, OutputError> {
    let mut state = AggregateState::new(bucket_width)?;

    for (label, bucket) in raw {
        let key = parse_label(&label, bucket_width)?;
        state.add_bucket(key, bucket);
    }

    Ok(state)
}

/// Turn a start label back into a key, checking it sits on a bucket boundary
///
/// **Private** - internal helper for from_labeled
fn parse_label(label: &str, bucket_width: f64) -> Result<BucketKey, OutputError> {
    let start: f64 = label
        .trim()
        .parse()
        .map_err(|_| OutputError::InvalidBucketKey(format!("'{}' is not a number", label)))?;
    if !start.is_finite() {
        return Err(OutputError::InvalidBucketKey(format!("'{}' is not finite", label)));
    }

    let index = (start / bucket_width).round();
    let tolerance = 1e-9 * start.abs().max(1.0);
    if (index * bucket_width - start).abs() > tolerance {
        return Err(OutputError::InvalidBucketKey(format!(
            "'{}' is not a multiple of the bucket width {}",
            label, bucket_width
        )));
    }

    Ok(BucketKey::from_index(index as i64))
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("0.0", 300.0).unwrap().index(), 0);
        assert_eq!(parse_label("300.0", 300.0).unwrap().index(), 1);
        assert_eq!(parse_label("1700000100.0", 300.0).unwrap().index(), 5666667);
        assert!(parse_label("150.0", 300.0).is_err());
        assert!(parse_label("abc", 300.0).is_err());
        assert!(parse_label("inf", 300.0).is_err());
    }

    #[test]
    fn test_large_label_reads_back() {
        let key = BucketKey::from_index(100_000_000_000_000);
        let label = key.label(300.0);
        assert!(!label.contains('e'));
        assert_eq!(parse_label(&label, 300.0).unwrap(), key);
    }

    #[test]
    fn test_read_stats_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        let err = read_stats(&missing, 300.0).unwrap_err();
        match err {
            OutputError::ReadFailed { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected ReadFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_stats_from_str_merges_equal_keys() {
        // "300" and "300.0" name the same bucket
        let json = r#"{
            "300": {"events": {"SIGCHLD": 1}, "calls": {}},
            "300.0": {"events": {"SIGCHLD": 2}, "calls": {}}
        }"#;
        let state = stats_from_str(json, 300.0).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.total_events(), 3);
    }

    #[test]
    fn test_stats_from_str_missing_sections_default() {
        let state = stats_from_str(r#"{"0.0": {}}"#, 300.0).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.total_calls(), 0);
    }
}
