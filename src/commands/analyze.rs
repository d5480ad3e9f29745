//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Validates configuration
//! 2. Aggregates every trace file in parallel
//! 3. Writes JSON statistics (and optionally CSV and a text summary)

use super::models::AnalyzeArgs;
use crate::output::{export, render_summary, write_csv, write_stats, write_stats_to};
use crate::runner::{run_parallel, RunReport};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid configuration (bucket width, no files, zero workers)
/// * Any trace file that cannot be opened or read
/// * Output write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<RunReport> {
    let start_time = Instant::now();

    info!("Step 1/3: Aggregating {} trace file(s)...", args.strace_files.len());
    let report = run_parallel(&args.strace_files, &args.run_config())
        .context("Failed to aggregate trace files")?;

    for source in &report.sources {
        debug!(
            "  {}: {} lines, {} records, {} skipped",
            source.path.display(),
            source.stats.lines,
            source.stats.records,
            source.stats.skipped()
        );
    }
    info!(
        "Parsed {} of {} lines ({} skipped)",
        report.total_lines() - report.total_skipped(),
        report.total_lines(),
        report.total_skipped()
    );

    info!("Step 2/3: Writing statistics...");
    match &args.output_json {
        Some(path) => {
            write_stats(&report.state, path).context("Failed to write statistics JSON")?;
            info!("✓ Statistics written to: {}", path.display());
        }
        None => {
            write_stats_to(&report.state, std::io::stdout().lock())
                .context("Failed to write statistics to stdout")?;
        }
    }

    info!("Step 3/3: Writing optional outputs...");
    if let Some(csv_path) = &args.output_csv {
        write_csv(&export(&report.state), csv_path).context("Failed to write CSV")?;
        info!("✓ CSV written to: {}", csv_path.display());
    }

    if args.print_summary {
        eprintln!("\n{}", "=".repeat(80));
        eprintln!("STRACE BUCKET SUMMARY");
        eprintln!("{}", "=".repeat(80));
        eprintln!("{}", render_summary(&report.state, args.top_calls));
        eprintln!("{}", "=".repeat(80));
    }

    info!(
        "Analyze completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.strace_files.is_empty() {
        anyhow::bail!("At least one strace file is required");
    }

    args.run_config()
        .validate()
        .context("Invalid run configuration")?;

    if args.print_summary && args.top_calls == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if let (Some(json), Some(csv)) = (&args.output_json, &args.output_csv) {
        if json == csv {
            anyhow::bail!("JSON and CSV outputs must be different files");
        }
    }

    Ok(())
}
