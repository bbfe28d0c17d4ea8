//! End-to-end planning and scanning over the in-memory store.

use std::sync::Arc;

use futures::TryStreamExt;
use rf_error::{ErrorCategory, classify_error};
use rf_planner::{ObjectReader, RangeScanner, SplitPlanner};
use rf_traits::{CursorStyle, MemoryStore};
use rf_types::{PlannerConfig, ScanConfig, Split, decode_split_frames, encode_split_frames};

use crate::common::scan_all;

fn populated(style: CursorStyle, count: usize) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new().with_cursor_style(style));
    store.put_numbered("bucket", "data/", count, 4);
    store.put("bucket", "other/unrelated", "x");
    store
}

#[tokio::test]
async fn test_splits_partition_the_prefix_exactly() {
    for style in [CursorStyle::LastKey, CursorStyle::Opaque] {
        for (count, page_size, split_size) in [(100, 7, 10), (101, 10, 10), (3, 50, 2), (64, 8, 64)] {
            let store = populated(style, count);
            let config = PlannerConfig::new("bucket")
                .with_prefix("data/")
                .with_page_size(page_size)
                .with_split_size(split_size);

            let splits = SplitPlanner::new(store.clone(), config).plan().await.unwrap();
            let keys = scan_all(store, &splits, page_size + 3).await;

            let expected: Vec<String> = (1..=count).map(|n| format!("data/{n:04}")).collect();
            assert_eq!(keys, expected, "count={count} page={page_size} split={split_size}");

            for pair in splits.windows(2) {
                assert_eq!(pair[1].start_marker.as_deref(), Some(pair[0].end_key_inclusive.as_str()));
            }
            let total: u32 = splits.iter().map(|s| s.approx_size).sum();
            assert_eq!(total as usize, count);
        }
    }
}

#[tokio::test]
async fn test_split_count_plan_scans_the_prefix() {
    let store = populated(CursorStyle::LastKey, 50);
    let config = PlannerConfig::new("bucket").with_prefix("data/").with_page_size(9).with_split_count(6);

    let splits = SplitPlanner::new(store.clone(), config).plan().await.unwrap();

    assert_eq!(splits.len(), 6);
    assert!(splits.iter().all(|s| s.approx_size <= 9));
    assert_eq!(scan_all(store, &splits, 500).await.len(), 50);
}

#[tokio::test]
async fn test_splits_survive_wire_handoff() {
    let store = populated(CursorStyle::LastKey, 30);
    let config = PlannerConfig::new("bucket").with_prefix("data/").with_split_size(7);
    let splits = SplitPlanner::new(store.clone(), config).plan().await.unwrap();

    let decoded = decode_split_frames(encode_split_frames(&splits)).unwrap();
    assert_eq!(decoded, splits);
    assert_eq!(scan_all(store, &decoded, 4).await.len(), 30);
}

#[tokio::test]
async fn test_keys_added_after_planning_land_in_one_split() {
    let store = populated(CursorStyle::LastKey, 20);
    let config = PlannerConfig::new("bucket").with_prefix("data/").with_split_size(5);
    let splits = SplitPlanner::new(store.clone(), config).plan().await.unwrap();

    store.put("bucket", "data/0007a", "late");
    store.remove("bucket", "data/0012");

    let keys = scan_all(store.clone(), &splits, 3).await;
    assert_eq!(keys.len(), 20);
    assert_eq!(keys.iter().filter(|k| k.as_str() == "data/0007a").count(), 1);
    assert!(!keys.contains(&"data/0012".to_string()));

    // Keys past the last planned end are not picked up by any split
    store.put("bucket", "data/9999", "late");
    assert_eq!(scan_all(store, &splits, 3).await.len(), 20);
}

#[tokio::test]
async fn test_scanners_run_concurrently() {
    let store = populated(CursorStyle::Opaque, 200);
    let config = PlannerConfig::new("bucket").with_prefix("data/").with_page_size(16).with_split_count(8);
    let splits = SplitPlanner::new(store.clone(), config).plan().await.unwrap();

    let handles: Vec<_> = splits
        .into_iter()
        .map(|split: Split| {
            let store = store.clone();
            tokio::spawn(async move {
                RangeScanner::new(store, split, ScanConfig::new().with_page_size(5))
                    .into_stream()
                    .try_collect::<Vec<_>>()
                    .await
            })
        })
        .collect();

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap().unwrap().len();
    }
    assert_eq!(total, 200);
}

#[tokio::test]
async fn test_reader_recovers_from_transient_faults() {
    let store = populated(CursorStyle::LastKey, 12);
    let split = Split::new("bucket", "data/", None, "data/0012", 12);
    let scanner = RangeScanner::new(store.clone(), split, ScanConfig::new().with_page_size(5));
    let mut reader = ObjectReader::new(scanner, store.clone());

    let mut keys = Vec::new();
    let mut failures = 0;
    let (mut fetch_fault, mut list_fault) = (false, false);
    loop {
        if keys.len() == 3 && !fetch_fault {
            store.fail_next_fetches(1);
            fetch_fault = true;
        }
        if keys.len() == 5 && !list_fault {
            store.fail_next_lists(1);
            list_fault = true;
        }

        match reader.next().await {
            Ok(Some((summary, object))) => {
                assert_eq!(&object.content[..], format!("body of {}", summary.key).as_bytes());
                keys.push(summary.key);
            }
            Ok(None) => break,
            Err(e) => {
                assert_eq!(classify_error(&e), ErrorCategory::Transient);
                failures += 1;
                assert!(failures <= 2);
            }
        }
    }

    let expected: Vec<String> = (1..=12).map(|n| format!("data/{n:04}")).collect();
    assert_eq!(keys, expected);
    assert_eq!(failures, 2);
}
