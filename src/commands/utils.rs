use super::models::ExportArgs;
use crate::output::{export, read_stats, write_csv};
use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::Path;

/// Convert a statistics JSON file into the CSV table
pub fn execute_export(args: ExportArgs) -> Result<()> {
    let state = read_stats(&args.stats_file, args.bucket_width)
        .with_context(|| format!("Failed to read {}", args.stats_file.display()))?;
    let table = export(&state);

    match &args.output_csv {
        Some(path) => {
            write_csv(&table, path).context("Failed to write CSV")?;
            info!("✓ CSV written to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(table.to_csv().as_bytes())
                .context("Failed to write CSV to stdout")?;
        }
    }

    Ok(())
}

/// Validate a statistics JSON file
pub fn validate_stats_file(file_path: &Path, bucket_width: f64) -> Result<()> {
    println!("Validating statistics: {}", file_path.display());

    let state = read_stats(file_path, bucket_width)?;

    println!("✓ Valid statistics JSON");
    println!("  Bucket width: {}s", state.bucket_width());
    println!("  Buckets: {}", state.len());
    println!("  Distinct calls: {}", state.call_names().len());
    println!("  Calls: {}", state.total_calls());
    println!("  Signals: {}", state.total_events());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("strace-buckets v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Time-bucketed syscall and signal statistics from strace -ttt -T logs.");
}
