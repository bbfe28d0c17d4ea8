//! CLI argument definitions for rf-planner.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rf_cli_common::{LogLevel, S3Args, parse_positive_u32};
use rf_types::DEFAULT_PAGE_SIZE;

/// Plan contiguous key-range splits over an S3 prefix.
///
/// Lists the prefix once, in key order, and prints one split per line. Each
/// split can be handed to rf-scanner to re-list exactly its keys.
///
/// ## Examples
///
/// Fixed keys per split:
///   rf-planner -b my-bucket -p logs/ --split-size 10000
///
/// Fixed number of splits, as wire frames:
///   rf-planner -b my-bucket --split-count 32 --output-format wire > splits.bin
#[derive(Parser, Debug)]
#[command(name = "rf-planner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === S3 Configuration ===
    /// S3 bucket name
    #[arg(short, long, env = "RF_S3_BUCKET")]
    pub bucket: String,

    /// Key prefix to plan under (default: whole bucket)
    #[arg(short, long, env = "RF_S3_PREFIX", default_value = "")]
    pub prefix: String,

    #[command(flatten)]
    pub s3: S3Args,

    // === Planning Options ===
    /// Keys requested per listing call
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_positive_u32)]
    pub page_size: u32,

    /// Keys per split
    #[arg(long, value_parser = parse_positive_u32)]
    pub split_size: Option<u32>,

    /// Number of splits; takes precedence over --split-size
    #[arg(long, value_parser = parse_positive_u32)]
    pub split_count: Option<u32>,

    // === Output Options ===
    /// Output format
    #[arg(long, value_enum, default_value = "jsonl")]
    pub output_format: OutputFormat,

    /// Write splits to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// How splits are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Jsonl,
    /// Pretty-printed JSON array
    Json,
    /// Length-prefixed binary frames
    Wire,
}
