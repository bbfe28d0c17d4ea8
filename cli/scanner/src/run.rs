//! Main execution logic for rf-scanner CLI.

use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use futures::{StreamExt, stream};
use rf_planner::{ObjectReader, RangeScanner, ScanStats};
use rf_s3::S3Store;
use rf_traits::{SharedFetcher, SharedLister};
use rf_types::{KeySummary, ScanConfig, Split};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::args::Cli;
use crate::input::read_splits;

/// One output line.
#[derive(Debug, Serialize)]
struct ScannedKey<'a> {
    #[serde(flatten)]
    summary: &'a KeySummary,

    /// Length of the fetched content, with `--fetch`
    #[serde(skip_serializing_if = "Option::is_none")]
    content_length: Option<u64>,
}

/// Lines buffered between the scanning splits and the writer.
const OUTPUT_BUFFER_LINES: usize = 256;

/// Counters of one scanned split.
#[derive(Debug, Default)]
struct SplitOutput {
    keys: u64,
    bytes: u64,
    objects_fetched: u64,
    ordering_violations: u64,
}

/// Scan every split named in the input.
pub async fn execute(args: Cli) -> Result<ScanStats> {
    let splits = read_splits(args.input.as_deref(), args.input_format)?;

    let Some(first) = splits.first() else {
        warn!("No splits to scan");
        let mut stats = ScanStats::new();
        stats.complete();
        return Ok(stats);
    };

    let s3_config = args.s3.to_s3_config(&first.container);
    let store = Arc::new(
        S3Store::from_config(&s3_config)
            .await?
            .with_retry_config(args.s3.retry_config()),
    );

    info!(
        splits = splits.len(),
        concurrency = args.concurrency,
        fetch = args.fetch,
        "Scanning splits"
    );

    let fetcher: Option<SharedFetcher> = if args.fetch {
        Some(store.clone() as SharedFetcher)
    } else {
        None
    };
    let config = ScanConfig::new().with_page_size(args.page_size);

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = scan_splits(store, fetcher, splits, config, args.concurrency, &mut out).await?;
    out.flush()?;

    Ok(stats)
}

/// Scan `splits` with at most `concurrency` in flight, writing keys to `out`.
///
/// Keys are written as they are scanned, through a bounded buffer. Each
/// split's keys appear in key order; lines of concurrent splits interleave.
/// A failed split keeps the keys written before the failure, is recorded in
/// the stats, and does not stop the others.
pub async fn scan_splits<W: Write>(
    lister: SharedLister,
    fetcher: Option<SharedFetcher>,
    splits: Vec<Split>,
    config: ScanConfig,
    concurrency: usize,
    out: &mut W,
) -> Result<ScanStats> {
    let mut stats = ScanStats::new();
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(OUTPUT_BUFFER_LINES);

    let scans = stream::iter(splits)
        .map(move |split| {
            let lister = lister.clone();
            let fetcher = fetcher.clone();
            let lines = tx.clone();
            async move {
                let label = split.to_string();
                (label, scan_split(lister, fetcher, split, config, lines).await)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>();

    let write = async {
        while let Some(line) = rx.recv().await {
            out.write_all(&line)?;
        }
        Ok::<_, anyhow::Error>(())
    };

    let (results, written) = tokio::join!(scans, write);
    written?;

    for (label, result) in results {
        match result {
            Ok(output) => {
                stats.ordering_violations += output.ordering_violations;
                stats.record_split(output.keys, output.bytes, output.objects_fetched);
            }
            Err(e) => {
                warn!(split = %label, error = %e, "Split scan failed");
                stats.record_error(format!("{label}: {e}"));
            }
        }
    }

    stats.complete();
    Ok(stats)
}

async fn scan_split(
    lister: SharedLister,
    fetcher: Option<SharedFetcher>,
    split: Split,
    config: ScanConfig,
    lines: mpsc::Sender<Vec<u8>>,
) -> Result<SplitOutput> {
    let scanner = RangeScanner::new(lister, split, config);
    let mut output = SplitOutput::default();

    match fetcher {
        Some(fetcher) => {
            let mut reader = ObjectReader::new(scanner, fetcher);
            while let Some((summary, object)) = reader.next().await? {
                output.push(&lines, &summary, Some(object.metadata.content_length)).await?;
            }
            output.objects_fetched = reader.objects_fetched();
            output.ordering_violations = reader.into_scanner().ordering_violations();
        }
        None => {
            let mut scanner = scanner;
            while let Some(summary) = scanner.next().await? {
                output.push(&lines, &summary, None).await?;
            }
            output.ordering_violations = scanner.ordering_violations();
        }
    }

    Ok(output)
}

impl SplitOutput {
    async fn push(
        &mut self,
        lines: &mpsc::Sender<Vec<u8>>,
        summary: &KeySummary,
        content_length: Option<u64>,
    ) -> Result<()> {
        let mut line = serde_json::to_vec(&ScannedKey {
            summary,
            content_length,
        })?;
        line.push(b'\n');

        lines
            .send(line)
            .await
            .map_err(|_| anyhow!("output writer stopped"))?;

        self.keys += 1;
        self.bytes += summary.size;
        Ok(())
    }
}
