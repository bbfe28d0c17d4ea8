//! rf-scanner CLI
//!
//! Re-lists the keys of planned splits, optionally fetching each object.

use clap::Parser;
use rf_cli_common::{format_bytes, format_duration_ms, format_number, init_logging};

mod args;
mod input;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    eprintln!();
    eprintln!("Scan completed:");
    eprintln!("  Splits scanned:   {}", stats.splits_scanned);
    eprintln!("  Splits failed:    {}", stats.splits_failed);
    eprintln!("  Keys scanned:     {}", format_number(stats.keys_scanned));
    eprintln!("  Bytes listed:     {}", format_bytes(stats.bytes_scanned));

    if stats.objects_fetched > 0 {
        eprintln!("  Objects fetched:  {}", format_number(stats.objects_fetched));
    }

    if stats.ordering_violations > 0 {
        eprintln!("  Out-of-order:     {}", stats.ordering_violations);
    }

    if let Some(duration) = stats.duration() {
        eprintln!("  Duration:         {}", format_duration_ms(duration.num_milliseconds()));

        if let Some(kps) = stats.keys_per_second() {
            eprintln!("  Throughput:       {kps:.1} keys/sec");
        }
    }

    if stats.has_errors() {
        for error in &stats.errors {
            eprintln!("  Error: {error}");
        }
        std::process::exit(4);
    }

    Ok(())
}
