//! Shared test infrastructure.

pub mod localstack;

pub use localstack::LocalStackTestContext;

use rf_planner::RangeScanner;
use rf_traits::SharedLister;
use rf_types::{ScanConfig, Split};

/// Scan every split in order and return the concatenated keys.
pub async fn scan_all(lister: SharedLister, splits: &[Split], page_size: u32) -> Vec<String> {
    let mut keys = Vec::new();
    for split in splits {
        let mut scanner =
            RangeScanner::new(lister.clone(), split.clone(), ScanConfig::new().with_page_size(page_size));
        while let Some(item) = scanner.next().await.unwrap() {
            keys.push(item.key);
        }
    }
    keys
}
