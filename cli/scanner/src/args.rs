//! CLI argument definitions for rf-scanner.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rf_cli_common::{LogLevel, S3Args, parse_positive_u32, parse_positive_usize};
use rf_types::DEFAULT_PAGE_SIZE;

/// Scan planned splits and print their keys.
///
/// Reads splits produced by rf-planner and prints every key of every split
/// as one JSON object per line. Splits are scanned independently.
///
/// ## Examples
///
/// Pipe from the planner:
///   rf-planner -b my-bucket --split-count 16 | rf-scanner --concurrency 8
///
/// Wire frames from a file, fetching each object:
///   rf-scanner -i splits.bin --input-format wire --fetch
#[derive(Parser, Debug)]
#[command(name = "rf-scanner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Input Options ===
    /// File with planned splits (default: stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Format of the split input
    #[arg(long, value_enum, default_value = "jsonl")]
    pub input_format: InputFormat,

    // === S3 Configuration ===
    #[command(flatten)]
    pub s3: S3Args,

    // === Scan Options ===
    /// Keys requested per listing call
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_positive_u32)]
    pub page_size: u32,

    /// Splits scanned at the same time
    #[arg(long, default_value = "4", value_parser = parse_positive_usize)]
    pub concurrency: usize,

    /// Fetch each object and report its content length
    #[arg(long)]
    pub fetch: bool,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Encoding of the split input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// One JSON split per line
    Jsonl,
    /// Length-prefixed binary frames
    Wire,
}
