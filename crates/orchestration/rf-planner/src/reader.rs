//! Content reading on top of a range scan.

use rf_error::Result;
use rf_traits::SharedFetcher;
use rf_types::{KeySummary, Split, StoredObject};
use tracing::debug;

use crate::scanner::RangeScanner;

/// Yields each key of a split together with its fetched content.
///
/// If a fetch fails the key is held back and fetched again on the next call,
/// so a retry after an error never skips an object.
pub struct ObjectReader {
    scanner: RangeScanner,
    fetcher: SharedFetcher,
    pending: Option<KeySummary>,
    objects_fetched: u64,
}

impl ObjectReader {
    pub fn new(scanner: RangeScanner, fetcher: SharedFetcher) -> Self {
        Self {
            scanner,
            fetcher,
            pending: None,
            objects_fetched: 0,
        }
    }

    /// The split being read.
    pub fn split(&self) -> &Split {
        self.scanner.split()
    }

    /// Return the next key and its content.
    pub async fn next(&mut self) -> Result<Option<(KeySummary, StoredObject)>> {
        let summary = match self.pending.take() {
            Some(summary) => summary,
            None => match self.scanner.next().await? {
                Some(summary) => summary,
                None => return Ok(None),
            },
        };

        match self.fetcher.fetch(&summary).await {
            Ok(object) => {
                self.objects_fetched += 1;
                Ok(Some((summary, object)))
            }
            Err(e) => {
                debug!(key = %summary.key, error = %e, "Fetch failed, key kept for retry");
                self.pending = Some(summary);
                Err(e)
            }
        }
    }

    /// Objects fetched successfully.
    pub fn objects_fetched(&self) -> u64 {
        self.objects_fetched
    }

    /// Scan progress of the underlying split.
    pub fn progress(&self) -> f32 {
        self.scanner.progress()
    }

    /// Give back the underlying scanner.
    pub fn into_scanner(self) -> RangeScanner {
        self.scanner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_error::{RemoteError, RfError};
    use rf_traits::MemoryStore;
    use rf_types::ScanConfig;
    use std::sync::Arc;

    fn reader(store: &Arc<MemoryStore>, split: Split) -> ObjectReader {
        let scanner = RangeScanner::new(store.clone(), split, ScanConfig::new().with_page_size(2));
        ObjectReader::new(scanner, store.clone())
    }

    #[tokio::test]
    async fn test_reads_content_for_each_key() {
        let store = Arc::new(MemoryStore::new());
        store.put_numbered("bucket", "k", 5, 1);
        let mut reader = reader(&store, Split::new("bucket", "", Some("k1".into()), "k3", 2));

        let (summary, object) = reader.next().await.unwrap().unwrap();
        assert_eq!(summary.key, "k2");
        assert_eq!(&object.content[..], b"body of k2");

        let (summary, _) = reader.next().await.unwrap().unwrap();
        assert_eq!(summary.key, "k3");

        assert!(reader.next().await.unwrap().is_none());
        assert_eq!(reader.objects_fetched(), 2);
        assert_eq!(reader.progress(), 1.0);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried_without_skipping() {
        let store = Arc::new(MemoryStore::new());
        store.put_numbered("bucket", "k", 3, 1);
        let mut reader = reader(&store, Split::new("bucket", "", None, "k3", 3));

        assert_eq!(reader.next().await.unwrap().unwrap().0.key, "k1");

        store.fail_next_fetches(1);
        let err = reader.next().await.unwrap_err();
        assert!(matches!(err, RfError::Remote(RemoteError::Fetch(_))));

        assert_eq!(reader.next().await.unwrap().unwrap().0.key, "k2");
        assert_eq!(reader.next().await.unwrap().unwrap().0.key, "k3");
        assert!(reader.next().await.unwrap().is_none());
        assert_eq!(store.fetch_calls(), 4);
    }

    #[tokio::test]
    async fn test_missing_object_surfaces_not_found() {
        let listing = Arc::new(MemoryStore::new());
        listing.put("bucket", "a", "1");
        let scanner = RangeScanner::new(listing, Split::new("bucket", "", None, "a", 1), ScanConfig::new());

        // Listed in one store, absent from the one serving content
        let mut reader = ObjectReader::new(scanner, Arc::new(MemoryStore::new()));
        let err = reader.next().await.unwrap_err();
        assert!(matches!(err, RfError::Remote(RemoteError::NotFound(_))));
    }
}
