//! Listing requests and the pages they return.

use serde::{Deserialize, Serialize};

use crate::KeySummary;

/// Parameters of one listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    /// Bucket to list
    pub container: String,

    /// Only keys starting with this prefix are returned (empty = all keys)
    pub prefix: String,

    /// Keys strictly greater than the marker are returned
    pub marker: Option<String>,

    /// Optional hierarchy delimiter; rangeflow always lists flat
    pub delimiter: Option<String>,

    /// Maximum number of keys per page
    pub page_size: u32,
}

impl ListRequest {
    /// Create a flat listing request with no marker.
    pub fn new(container: impl Into<String>, prefix: impl Into<String>, page_size: u32) -> Self {
        Self {
            container: container.into(),
            prefix: prefix.into(),
            marker: None,
            delimiter: None,
            page_size,
        }
    }

    /// Start listing after the given marker.
    pub fn with_marker(mut self, marker: Option<String>) -> Self {
        self.marker = marker;
        self
    }
}

/// One batch returned by a single listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The request that produced this page
    pub request: ListRequest,

    /// Items in ascending key order
    pub items: Vec<KeySummary>,

    /// Opaque cursor for the next call; only meaningful when `truncated`
    pub continuation_cursor: Option<String>,

    /// `false` marks the final page
    pub truncated: bool,
}

impl Page {
    /// Create a final page.
    pub fn new(request: ListRequest, items: Vec<KeySummary>) -> Self {
        Self {
            request,
            items,
            continuation_cursor: None,
            truncated: false,
        }
    }

    /// Mark the page as truncated with the given continuation cursor.
    pub fn with_continuation(mut self, cursor: Option<String>) -> Self {
        self.truncated = true;
        self.continuation_cursor = cursor;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Marker for the next call.
    ///
    /// Uses the continuation cursor, falling back to the last key of the page
    /// when the store reports truncation without one.
    pub fn next_marker(&self) -> Option<String> {
        if !self.truncated {
            return None;
        }

        self.continuation_cursor
            .clone()
            .or_else(|| self.items.last().map(|item| item.key.clone()))
    }

    /// Whether no further page can be fetched after this one.
    pub fn is_final(&self) -> bool {
        self.next_marker().is_none()
    }

    /// The request for the page following this one, if any.
    pub fn next_request(&self) -> Option<ListRequest> {
        self.next_marker()
            .map(|marker| self.request.clone().with_marker(Some(marker)))
    }
}
