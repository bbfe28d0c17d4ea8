//! Object store capability traits.

use std::sync::Arc;

use async_trait::async_trait;
use rf_error::Result;
use rf_types::{KeySummary, ListRequest, Page, StoredObject};

/// Paged listing over an ordered key space.
///
/// Implementations return keys strictly greater than `request.marker`, in
/// ascending order, at most `request.page_size` per page. They do not retry;
/// callers may re-issue a failed call unchanged.
///
/// Implementations include:
/// - [`MemoryStore`](crate::MemoryStore) (testing/development)
/// - `rf_s3::S3Store` (production)
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Fetch one page.
    async fn list(&self, request: &ListRequest) -> Result<Page>;

    /// Fetch the page following `previous`.
    ///
    /// # Default Implementation
    ///
    /// Re-issues [`list`](ObjectLister::list) with the previous page's
    /// continuation marker. When `previous` is final, returns an empty final
    /// page without calling the store.
    async fn list_next(&self, previous: &Page) -> Result<Page> {
        match previous.next_request() {
            Some(request) => self.list(&request).await,
            None => Ok(Page::new(previous.request.clone(), Vec::new())),
        }
    }
}

/// Retrieval of a single object's content and metadata.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Fetch the object at `container/key`.
    async fn get_object(&self, container: &str, key: &str) -> Result<StoredObject>;

    /// Fetch the object a listing entry refers to.
    async fn fetch(&self, summary: &KeySummary) -> Result<StoredObject> {
        self.get_object(&summary.container, &summary.key).await
    }
}

/// Shared handle to a lister.
pub type SharedLister = Arc<dyn ObjectLister>;

/// Shared handle to a fetcher.
pub type SharedFetcher = Arc<dyn ObjectFetcher>;
