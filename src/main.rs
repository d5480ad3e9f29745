//! strace-buckets CLI
//!
//! Aggregates strace logs into fixed-width time buckets and exports the
//! result as JSON or CSV.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use strace_buckets::commands::{
    display_version, execute_analyze, execute_export, validate_args, validate_stats_file,
    AnalyzeArgs, ExportArgs,
};
use strace_buckets::utils::config::{DEFAULT_BUCKET_WIDTH_SECS, DEFAULT_TOP_CALLS};

/// strace-buckets - bucketed statistics for strace -T logs
#[derive(Parser, Debug)]
#[command(name = "strace-buckets")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate strace log files into time buckets
    Analyze {
        /// The log files to parse
        #[arg(short = 'f', long = "strace-files", num_args = 1.., required = true)]
        files: Vec<PathBuf>,

        /// Bucket width in seconds
        #[arg(short = 'w', long, default_value_t = DEFAULT_BUCKET_WIDTH_SECS, env = "STRACE_BUCKETS_WIDTH")]
        bucket_width: f64,

        /// Output path for JSON statistics (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the mean-duration CSV table to this path
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Maximum number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Do not log per-file progress
        #[arg(short, long)]
        quiet: bool,

        /// Print text summary to stderr
        #[arg(long)]
        summary: bool,

        /// Number of calls listed in the summary
        #[arg(long, default_value_t = DEFAULT_TOP_CALLS)]
        top: usize,
    },

    /// Convert a statistics JSON file to CSV
    Export {
        /// Path to statistics JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Bucket width the statistics were built with
        #[arg(short = 'w', long, default_value_t = DEFAULT_BUCKET_WIDTH_SECS, env = "STRACE_BUCKETS_WIDTH")]
        bucket_width: f64,

        /// Output path for CSV (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a statistics JSON file
    Validate {
        /// Path to statistics JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Bucket width the statistics were built with
        #[arg(short = 'w', long, default_value_t = DEFAULT_BUCKET_WIDTH_SECS, env = "STRACE_BUCKETS_WIDTH")]
        bucket_width: f64,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging (stderr, so JSON on stdout stays clean)
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            files,
            bucket_width,
            output,
            csv,
            jobs,
            quiet,
            summary,
            top,
        } => {
            let args = AnalyzeArgs {
                strace_files: files,
                bucket_width,
                output_json: output,
                output_csv: csv,
                workers: jobs,
                report_progress: !quiet,
                print_summary: summary,
                top_calls: top,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Export {
            file,
            bucket_width,
            output,
        } => {
            execute_export(ExportArgs {
                stats_file: file,
                bucket_width,
                output_csv: output,
            })?;
        }

        Commands::Validate { file, bucket_width } => {
            validate_stats_file(&file, bucket_width)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
