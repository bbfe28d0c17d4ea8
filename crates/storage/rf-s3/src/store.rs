//! S3-backed [`ObjectLister`] and [`ObjectFetcher`].

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::DateTime as AwsDateTime;
use chrono::{DateTime, Utc};
use rf_error::{RemoteError, Result};
use rf_traits::{ObjectFetcher, ObjectLister};
use rf_types::{KeySummary, ListRequest, ObjectMetadata, Owner, Page, StoredObject};
use tracing::{debug, trace};

use crate::client::{S3Config, create_s3_client};
use crate::retry::{RetryConfig, with_retry};

/// Object store backed by an S3 bucket.
///
/// Listing uses ListObjects (v1) so that any key can serve as a marker. Each
/// call is retried on transient errors with the exact same request.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    retry: RetryConfig,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Build a store with a client created from `config`.
    pub async fn from_config(config: &S3Config) -> Result<Self> {
        Ok(Self::new(create_s3_client(config).await?))
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn list_once(&self, request: &ListRequest) -> Result<Page> {
        let mut req = self
            .client
            .list_objects()
            .bucket(&request.container)
            .max_keys(i32::try_from(request.page_size).unwrap_or(i32::MAX));

        if !request.prefix.is_empty() {
            req = req.prefix(&request.prefix);
        }

        if let Some(marker) = &request.marker {
            req = req.marker(marker);
        }

        if let Some(delimiter) = &request.delimiter {
            req = req.delimiter(delimiter);
        }

        let resp = req.send().await.map_err(|e| {
            remote_error(
                ListOrFetch::List,
                format!(
                    "s3://{}/{}: {}",
                    request.container,
                    request.prefix,
                    DisplayErrorContext(&e)
                ),
            )
        })?;

        let items: Vec<KeySummary> = resp
            .contents()
            .iter()
            .filter_map(|obj| {
                let key = obj.key()?;
                let mut summary =
                    KeySummary::new(&request.container, key, obj.size().unwrap_or(0).max(0) as u64)
                        .with_content_hash(obj.e_tag().unwrap_or_default())
                        .with_storage_class(
                            obj.storage_class().map(|c| c.as_str()).unwrap_or_default(),
                        );

                if let Some(t) = obj.last_modified().and_then(to_chrono) {
                    summary = summary.with_last_modified(t);
                }

                if let Some(owner) = obj.owner() {
                    summary = summary.with_owner(Owner::new(
                        owner.id().unwrap_or_default(),
                        owner.display_name().unwrap_or_default(),
                    ));
                }

                Some(summary)
            })
            .collect();

        let truncated = resp.is_truncated().unwrap_or(false);

        trace!(
            bucket = %request.container,
            prefix = %request.prefix,
            marker = ?request.marker,
            items = items.len(),
            truncated,
            "Listed S3 page"
        );

        let page = Page::new(request.clone(), items);
        if !truncated {
            return Ok(page);
        }

        // NextMarker is only returned when a delimiter is set; Page falls
        // back to the last key otherwise.
        let cursor = resp.next_marker().map(str::to_string);
        Ok(page.with_continuation(cursor))
    }

    async fn get_once(&self, container: &str, key: &str) -> Result<StoredObject> {
        debug!(bucket = container, key = key, "Downloading object from S3");

        let resp = self
            .client
            .get_object()
            .bucket(container)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                remote_error(
                    ListOrFetch::Fetch,
                    format!("s3://{container}/{key}: {}", DisplayErrorContext(&e)),
                )
            })?;

        let metadata = ObjectMetadata {
            content_length: resp.content_length().unwrap_or(0).max(0) as u64,
            content_type: resp.content_type().map(str::to_string),
            content_encoding: resp.content_encoding().map(str::to_string),
            content_disposition: resp.content_disposition().map(str::to_string),
            cache_control: resp.cache_control().map(str::to_string),
            etag: resp.e_tag().map(str::to_string),
            last_modified: resp.last_modified().and_then(to_chrono),
            user_metadata: resp.metadata().cloned().unwrap_or_default(),
        };

        let body = resp.body.collect().await.map_err(|e| {
            RemoteError::Fetch(format!("failed to read body of s3://{container}/{key}: {e}"))
        })?;
        let content = body.into_bytes();

        trace!(bucket = container, key = key, size = content.len(), "Downloaded object");

        Ok(StoredObject::new(container, key, content).with_metadata(metadata))
    }
}

#[async_trait]
impl ObjectLister for S3Store {
    async fn list(&self, request: &ListRequest) -> Result<Page> {
        with_retry(&self.retry, "list_objects", || self.list_once(request)).await
    }
}

#[async_trait]
impl ObjectFetcher for S3Store {
    async fn get_object(&self, container: &str, key: &str) -> Result<StoredObject> {
        with_retry(&self.retry, "get_object", || self.get_once(container, key)).await
    }
}

#[derive(Debug, Clone, Copy)]
enum ListOrFetch {
    List,
    Fetch,
}

/// Map an S3 error message onto the store error taxonomy.
fn remote_error(operation: ListOrFetch, message: String) -> RemoteError {
    if message.contains("NoSuchBucket") || message.contains("NoSuchKey") {
        return RemoteError::NotFound(message);
    }

    if message.contains("AccessDenied") || message.contains("InvalidAccessKeyId") {
        return RemoteError::AccessDenied(message);
    }

    match operation {
        ListOrFetch::List => RemoteError::List(message),
        ListOrFetch::Fetch => RemoteError::Fetch(message),
    }
}

fn to_chrono(t: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_error::{ErrorCategory, RfError, classify_error};

    #[test]
    fn test_missing_bucket_maps_to_not_found() {
        let err = remote_error(ListOrFetch::List, "NoSuchBucket: gone".into());
        assert!(matches!(err, RemoteError::NotFound(_)));
        assert_eq!(classify_error(&RfError::Remote(err)), ErrorCategory::Permanent);
    }

    #[test]
    fn test_access_denied() {
        let err = remote_error(ListOrFetch::Fetch, "AccessDenied: nope".into());
        assert!(matches!(err, RemoteError::AccessDenied(_)));
    }

    #[test]
    fn test_other_errors_keep_operation() {
        let err = remote_error(ListOrFetch::List, "503 SlowDown".into());
        assert!(matches!(err, RemoteError::List(_)));
        assert_eq!(classify_error(&RfError::Remote(err)), ErrorCategory::Transient);

        let err = remote_error(ListOrFetch::Fetch, "connection reset".into());
        assert!(matches!(err, RemoteError::Fetch(_)));
    }

    #[test]
    fn test_timestamp_conversion() {
        let t = AwsDateTime::from_secs_and_nanos(1_700_000_000, 500);
        let converted = to_chrono(&t).unwrap();
        assert_eq!(converted.timestamp(), 1_700_000_000);
        assert_eq!(converted.timestamp_subsec_nanos(), 500);
    }
}
