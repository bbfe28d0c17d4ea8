//! In-memory object store for development and testing.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use rf_error::{RemoteError, Result};
use rf_types::{KeySummary, ListRequest, ObjectMetadata, Page, StoredObject};
use tracing::trace;

use crate::{ObjectFetcher, ObjectLister};

/// How [`MemoryStore`] fills in continuation cursors on truncated pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    /// No cursor; callers continue from the last key (S3 ListObjects without a delimiter)
    #[default]
    LastKey,

    /// Opaque tokens `c1`, `c2`, ... that only the store can resolve
    Opaque,
}

/// Ordered in-memory key space implementing [`ObjectLister`] and [`ObjectFetcher`].
///
/// Supports injecting transient failures so callers' retry and idempotency
/// behaviour can be exercised.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<(String, String), (KeySummary, Bytes)>>,
    cursor_style: CursorStyle,
    cursors: Mutex<HashMap<String, String>>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    pending_list_failures: AtomicUsize,
    pending_fetch_failures: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given cursor style for truncated pages.
    pub fn with_cursor_style(mut self, style: CursorStyle) -> Self {
        self.cursor_style = style;
        self
    }

    /// Store an object, replacing any previous content.
    pub fn put(&self, container: &str, key: &str, content: impl Into<Bytes>) {
        let content = content.into();
        let summary = KeySummary::new(container, key, content.len() as u64)
            .with_content_hash(format!("{:x}", content.len()))
            .with_storage_class("STANDARD");

        self.objects
            .lock()
            .insert((container.to_string(), key.to_string()), (summary, content));
    }

    /// Store `count` objects named `{prefix}{n:0width$}` with small bodies.
    pub fn put_numbered(&self, container: &str, prefix: &str, count: usize, width: usize) {
        for n in 1..=count {
            let key = format!("{prefix}{n:0width$}");
            self.put(container, &key, format!("body of {key}"));
        }
    }

    /// Remove an object. Returns whether it existed.
    pub fn remove(&self, container: &str, key: &str) -> bool {
        self.objects
            .lock()
            .remove(&(container.to_string(), key.to_string()))
            .is_some()
    }

    /// Number of objects in the store.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// Fail the next `count` list calls with a transient error.
    pub fn fail_next_lists(&self, count: usize) {
        self.pending_list_failures.store(count, Ordering::SeqCst);
    }

    /// Fail the next `count` fetch calls with a transient error.
    pub fn fail_next_fetches(&self, count: usize) {
        self.pending_fetch_failures.store(count, Ordering::SeqCst);
    }

    /// Number of list calls made so far, failed ones included.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of fetch calls made so far, failed ones included.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn resolve_marker(&self, marker: Option<&str>) -> Option<String> {
        let marker = marker?;
        let cursors = self.cursors.lock();
        Some(cursors.get(marker).cloned().unwrap_or_else(|| marker.to_string()))
    }

    fn issue_cursor(&self, last_key: &str) -> Option<String> {
        match self.cursor_style {
            CursorStyle::LastKey => None,
            CursorStyle::Opaque => {
                let mut cursors = self.cursors.lock();
                let token = format!("c{}", cursors.len() + 1);
                cursors.insert(token.clone(), last_key.to_string());
                Some(token)
            }
        }
    }
}

#[async_trait]
impl ObjectLister for MemoryStore {
    async fn list(&self, request: &ListRequest) -> Result<Page> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if Self::take_failure(&self.pending_list_failures) {
            return Err(RemoteError::List("503 Service Unavailable".to_string()).into());
        }

        let marker = self.resolve_marker(request.marker.as_deref());
        let page_size = request.page_size.max(1) as usize;

        let (items, truncated) = {
            let objects = self.objects.lock();
            let mut matching = objects
                .iter()
                .filter(|((container, key), _)| {
                    container.as_str() == request.container
                        && key.starts_with(request.prefix.as_str())
                        && marker.as_deref().is_none_or(|m| key.as_str() > m)
                })
                .map(|(_, (summary, _))| summary.clone());

            let items: Vec<KeySummary> = matching.by_ref().take(page_size).collect();
            (items, matching.next().is_some())
        };

        trace!(
            container = %request.container,
            prefix = %request.prefix,
            marker = ?request.marker,
            items = items.len(),
            truncated,
            "Listed memory store page"
        );

        let page = Page::new(request.clone(), items);
        if !truncated {
            return Ok(page);
        }

        let cursor = page
            .items
            .last()
            .and_then(|last| self.issue_cursor(&last.key));
        Ok(page.with_continuation(cursor))
    }
}

#[async_trait]
impl ObjectFetcher for MemoryStore {
    async fn get_object(&self, container: &str, key: &str) -> Result<StoredObject> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if Self::take_failure(&self.pending_fetch_failures) {
            return Err(RemoteError::Fetch("503 Service Unavailable".to_string()).into());
        }

        let objects = self.objects.lock();
        let (summary, content) = objects
            .get(&(container.to_string(), key.to_string()))
            .ok_or_else(|| RemoteError::NotFound(format!("{container}/{key}")))?;

        let metadata = ObjectMetadata {
            content_length: content.len() as u64,
            etag: Some(summary.content_hash.clone()),
            last_modified: summary.last_modified,
            ..Default::default()
        };

        Ok(StoredObject::new(container, key, content.clone()).with_metadata(metadata))
    }
}

/// Lister that replays a fixed sequence of pages.
///
/// The first page answers requests without a marker; every following page
/// answers requests carrying the previous page's continuation marker. Any
/// other marker yields an empty final page.
#[derive(Debug)]
pub struct ScriptedLister {
    pages: HashMap<Option<String>, Page>,
    calls: AtomicUsize,
}

impl ScriptedLister {
    pub fn new(pages: Vec<Page>) -> Self {
        let mut by_marker = HashMap::new();
        let mut marker = None;

        for page in pages {
            let next = page.next_marker();
            by_marker.insert(marker, page);
            marker = next;
        }

        Self {
            pages: by_marker,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of list calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectLister for ScriptedLister {
    async fn list(&self, request: &ListRequest) -> Result<Page> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.pages.get(&request.marker) {
            Some(page) => Ok(Page {
                request: request.clone(),
                ..page.clone()
            }),
            None => Ok(Page::new(request.clone(), Vec::new())),
        }
    }
}
