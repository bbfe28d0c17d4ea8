//! rf-planner CLI
//!
//! Cuts an S3 prefix into contiguous key-range splits.

use clap::Parser;
use rf_cli_common::{format_duration_ms, format_number, init_logging};

mod args;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    eprintln!();
    eprintln!("Planning completed:");
    eprintln!("  Splits planned:   {}", format_number(stats.splits_planned as u64));
    eprintln!("  Keys listed:      {}", format_number(stats.keys_listed));
    eprintln!("  Pages fetched:    {}", format_number(stats.pages_fetched));

    if stats.ordering_violations > 0 {
        eprintln!("  Out-of-order:     {}", stats.ordering_violations);
    }

    if let Some(duration) = stats.duration() {
        eprintln!("  Duration:         {}", format_duration_ms(duration.num_milliseconds()));
    }

    Ok(())
}
