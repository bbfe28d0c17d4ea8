//! S3 planning and scanning tests using LocalStack.

use std::sync::Arc;

use rf_error::{RemoteError, RfError};
use rf_planner::{ObjectReader, RangeScanner, SplitPlanner};
use rf_traits::{ObjectFetcher, ObjectLister};
use rf_types::{ListRequest, PlannerConfig, ScanConfig};

use crate::common::{LocalStackTestContext, scan_all};

const BUCKET: &str = "rf-integration";

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_list_pages_with_marker() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    ctx.create_bucket(BUCKET).await.unwrap();
    ctx.clear_prefix(BUCKET, "paging/").await.unwrap();
    ctx.put_numbered(BUCKET, "paging/", 5).await.unwrap();

    let store = ctx.store(BUCKET).await;
    let page = store
        .list(&ListRequest::new(BUCKET, "paging/", 2))
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert!(page.truncated);
    assert_eq!(page.next_marker().as_deref(), Some("paging/0002"));
    assert_eq!(page.items[0].storage_class, "STANDARD");

    let next = store.list_next(&page).await.unwrap();
    let keys: Vec<&str> = next.items.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, vec!["paging/0003", "paging/0004"]);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_plan_and_scan_s3_prefix() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    ctx.create_bucket(BUCKET).await.unwrap();
    ctx.clear_prefix(BUCKET, "plan/").await.unwrap();
    let expected = ctx.put_numbered(BUCKET, "plan/", 23).await.unwrap();
    ctx.put(BUCKET, "unrelated/key", "x").await.unwrap();

    let store = Arc::new(ctx.store(BUCKET).await);
    let config = PlannerConfig::new(BUCKET)
        .with_prefix("plan/")
        .with_page_size(4)
        .with_split_size(5);

    let splits = SplitPlanner::new(store.clone(), config).plan().await.unwrap();

    assert_eq!(splits.len(), 5);
    assert_eq!(splits[4].approx_size, 3);
    assert_eq!(scan_all(store, &splits, 3).await, expected);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_read_objects_in_split() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    ctx.create_bucket(BUCKET).await.unwrap();
    ctx.clear_prefix(BUCKET, "read/").await.unwrap();
    ctx.put_numbered(BUCKET, "read/", 4).await.unwrap();

    let store = Arc::new(ctx.store(BUCKET).await);
    let splits = SplitPlanner::new(
        store.clone(),
        PlannerConfig::new(BUCKET).with_prefix("read/").with_split_count(2),
    )
    .plan()
    .await
    .unwrap();

    let scanner = RangeScanner::new(store.clone(), splits[1].clone(), ScanConfig::new());
    let mut reader = ObjectReader::new(scanner, store.clone());

    let (summary, object) = reader.next().await.unwrap().unwrap();
    assert_eq!(summary.key, "read/0003");
    assert_eq!(&object.content[..], b"body of read/0003");
    assert_eq!(object.metadata.content_type.as_deref(), Some("text/plain"));
    assert_eq!(object.metadata.content_length, 17);

    assert_eq!(reader.next().await.unwrap().unwrap().0.key, "read/0004");
    assert!(reader.next().await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_missing_object_and_bucket() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    ctx.create_bucket(BUCKET).await.unwrap();
    let store = ctx.store(BUCKET).await;

    let err = store.get_object(BUCKET, "does/not/exist").await.unwrap_err();
    assert!(matches!(err, RfError::Remote(RemoteError::NotFound(_))));

    let err = store
        .list(&ListRequest::new("rf-no-such-bucket", "", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, RfError::Remote(RemoteError::NotFound(_))));
}
