//! Tabular export: one row per bucket, one column per call name.
//!
//! Each cell is the mean duration (`total_duration / count`) of that call in
//! that bucket, or `0` when the call did not occur there. The reduction to a
//! mean happens only here; the aggregated state keeps totals and counts.

use crate::aggregator::AggregateState;
use crate::utils::error::OutputError;
use log::info;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Name of the first column
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// One bucket's row
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Bucket start label
    pub timestamp: String,

    /// Mean durations, aligned with `SummaryTable::call_columns`
    pub values: Vec<f64>,
}

/// Exported table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    /// Call names in first-seen order (the header is `timestamp` plus these)
    pub call_columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(TIMESTAMP_COLUMN)
            .chain(self.call_columns.iter().map(String::as_str))
            .collect()
    }

    /// Render as comma-separated text with a trailing newline per row
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header().join(","));
        out.push('\n');

        for row in &self.rows {
            out.push_str(&row.timestamp);
            for value in &row.values {
                out.push(',');
                out.push_str(&format_value(*value));
            }
            out.push('\n');
        }

        out
    }
}

/// Build the table from an aggregated state
///
/// **Public** - main entry point for tabular export
///
/// Rows follow bucket order (ascending start time). Columns appear as call
/// names are first discovered; rows built before a column existed are
/// back-filled with `0`.
pub fn export(state: &AggregateState) -> SummaryTable {
    let mut table = SummaryTable::default();
    let mut column_index: HashMap<&str, usize> = HashMap::new();

    for (key, bucket) in state.iter() {
        let mut values = vec![0.0; table.call_columns.len()];

        for (name, stats) in &bucket.calls {
            let column = match column_index.get(name.as_str()) {
                Some(&column) => column,
                None => {
                    let column = table.call_columns.len();
                    column_index.insert(name.as_str(), column);
                    table.call_columns.push(name.clone());
                    values.push(0.0);
                    column
                }
            };
            values[column] = stats.mean();
        }

        table.rows.push(SummaryRow {
            timestamp: key.label(state.bucket_width()),
            values,
        });
    }

    let width = table.call_columns.len();
    for row in &mut table.rows {
        row.values.resize(width, 0.0);
    }

    table
}

/// Write the table to a CSV file
///
/// # Errors
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_csv(table: &SummaryTable, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing CSV to: {}", output_path.display());

    super::validate_path(output_path)?;
    super::ensure_parent_dir(output_path)?;

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(table.to_csv().as_bytes())?;
    writer.flush()?;

    Ok(())
}

/// Locale-independent decimal; whole numbers print without a fraction
///
/// **Private** - internal formatting
fn format_value(value: f64) -> String {
    format!("{}", value)
}
