//! Bounded re-scanning of a single split.

use async_stream::try_stream;
use futures::Stream;
use rf_error::Result;
use rf_traits::SharedLister;
use rf_types::{KeySummary, ScanConfig, Split};
use tracing::{debug, trace, warn};

use crate::lister::PaginatedLister;

/// Forward-only scan of the keys in one split.
///
/// Opens its own [`PaginatedLister`] at the split's start marker and stops at
/// the first key past `end_key_inclusive`. That key belongs to the next split
/// and is dropped. Scanners share no state and may run concurrently.
pub struct RangeScanner {
    split: Split,
    lister: PaginatedLister,
    yielded: u64,
    bytes: u64,
    finished: bool,
}

impl RangeScanner {
    /// Create a scanner for `split`.
    pub fn new(lister: SharedLister, split: Split, config: ScanConfig) -> Self {
        let lister = PaginatedLister::new(
            lister,
            split.container.clone(),
            split.key_prefix.clone(),
            split.start_marker.clone(),
            config.page_size,
        );

        Self {
            split,
            lister,
            yielded: 0,
            bytes: 0,
            finished: false,
        }
    }

    /// The split being scanned.
    pub fn split(&self) -> &Split {
        &self.split
    }

    /// Return the next key in the split.
    ///
    /// Listing errors propagate without advancing the scan, so the call can be
    /// retried. An empty truncated page does not end the scan; the lister is
    /// polled again until it yields a key or is exhausted.
    pub async fn next(&mut self) -> Result<Option<KeySummary>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            match self.lister.next().await? {
                Some(item) if !self.split.is_past_end(&item.key) => {
                    if !self.split.contains(&item.key) {
                        warn!(
                            key = %item.key,
                            marker = ?self.split.start_marker,
                            "Listing returned a key at or before the split's start marker"
                        );
                    }
                    self.yielded += 1;
                    self.bytes += item.size;
                    trace!(location = %item.location(), "Scanned key");
                    return Ok(Some(item));
                }
                Some(item) => {
                    debug!(
                        key = %item.key,
                        last_key = %self.split.end_key_inclusive,
                        yielded = self.yielded,
                        "Reached end of split"
                    );
                    self.finished = true;
                    return Ok(None);
                }
                None if self.lister.is_exhausted() => {
                    debug!(yielded = self.yielded, "Listing exhausted");
                    self.finished = true;
                    return Ok(None);
                }
                None => trace!("Skipping empty truncated page"),
            }
        }
    }

    /// Whether the scan has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Keys yielded so far.
    pub fn items_yielded(&self) -> u64 {
        self.yielded
    }

    /// Total size of the keys yielded so far.
    pub fn bytes_yielded(&self) -> u64 {
        self.bytes
    }

    /// Pages fetched by the underlying lister.
    pub fn pages_fetched(&self) -> u64 {
        self.lister.pages_fetched()
    }

    /// Out-of-order keys seen by the underlying lister.
    pub fn ordering_violations(&self) -> u64 {
        self.lister.ordering_violations()
    }

    /// Fraction of the split consumed, based on the planned size.
    ///
    /// Always in `0.0..=1.0`. Splits with an unknown size report `0.0` until
    /// the scan finishes.
    pub fn progress(&self) -> f32 {
        if self.finished {
            return 1.0;
        }

        if self.split.approx_size == 0 {
            return 0.0;
        }

        (self.yielded as f32 / self.split.approx_size as f32).clamp(0.0, 1.0)
    }

    /// Consume the scanner as a stream of keys.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<KeySummary>> {
        try_stream! {
            while let Some(item) = self.next().await? {
                yield item;
            }
        }
    }
}
