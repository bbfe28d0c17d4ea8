//! Main execution logic for rf-planner CLI.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use rf_planner::{PlanStats, SplitPlanner};
use rf_s3::S3Store;
use rf_traits::SharedLister;
use rf_types::{PlannerConfig, Split, encode_split_frames};
use tracing::info;

use crate::args::{Cli, OutputFormat};

/// Plan splits for the configured bucket and write them out.
pub async fn execute(args: Cli) -> Result<PlanStats> {
    let config = planner_config(&args);

    // Reject bad sizing before creating a client
    config.resolve()?;

    let s3_config = args.s3.to_s3_config(&args.bucket);
    let store = S3Store::from_config(&s3_config)
        .await?
        .with_retry_config(args.s3.retry_config());

    info!(
        bucket = %args.bucket,
        prefix = %args.prefix,
        endpoint = ?args.s3.s3_endpoint,
        "Planning splits"
    );

    let (splits, stats) = plan(Arc::new(store), config).await?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_splits(&mut out, &splits, args.output_format)?;
            out.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            write_splits(&mut out, &splits, args.output_format)?;
            out.flush()?;
        }
    }

    Ok(stats)
}

pub fn planner_config(args: &Cli) -> PlannerConfig {
    let mut config = PlannerConfig::new(&args.bucket)
        .with_prefix(&args.prefix)
        .with_page_size(args.page_size);

    if let Some(split_size) = args.split_size {
        config = config.with_split_size(split_size);
    }

    if let Some(split_count) = args.split_count {
        config = config.with_split_count(split_count);
    }

    config
}

pub async fn plan(lister: SharedLister, config: PlannerConfig) -> Result<(Vec<Split>, PlanStats)> {
    let planner = SplitPlanner::new(lister, config);
    Ok(planner.plan_with_stats().await?)
}

/// Write splits in the requested format.
pub fn write_splits<W: Write>(out: &mut W, splits: &[Split], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for split in splits {
                serde_json::to_writer(&mut *out, split)?;
                out.write_all(b"\n")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, splits)?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Wire => {
            out.write_all(&encode_split_frames(splits))?;
        }
    }

    Ok(())
}
