//! Reading planned splits.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use rf_types::{Split, decode_split_frames};
use tracing::debug;

use crate::args::InputFormat;

/// Read splits from `path`, or stdin when no path is given.
pub fn read_splits(path: Option<&Path>, format: InputFormat) -> Result<Vec<Split>> {
    let reader: Box<dyn Read> = match path {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };

    let splits = match format {
        InputFormat::Jsonl => parse_jsonl(BufReader::new(reader))?,
        InputFormat::Wire => parse_wire(reader)?,
    };

    debug!(count = splits.len(), ?format, "Read splits");
    Ok(splits)
}

/// Parse one split per line. Blank lines are skipped.
pub fn parse_jsonl<R: BufRead>(reader: R) -> Result<Vec<Split>> {
    let mut splits = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read split input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let split: Split = serde_json::from_str(line)
            .with_context(|| format!("invalid split on line {}", index + 1))?;
        splits.push(split);
    }

    Ok(splits)
}

/// Parse length-prefixed split frames.
pub fn parse_wire<R: Read>(mut reader: R) -> Result<Vec<Split>> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .context("failed to read split input")?;

    Ok(decode_split_frames(buf.into())?)
}
