//! Fetched object content and metadata.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata returned alongside an object's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub content_length: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// User-defined `x-amz-meta-*` entries
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub user_metadata: HashMap<String, String>,
}

/// An object fetched from the store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub container: String,
    pub key: String,
    pub metadata: ObjectMetadata,
    pub content: Bytes,
}

impl StoredObject {
    /// Create an object whose metadata only carries the content length.
    pub fn new(container: impl Into<String>, key: impl Into<String>, content: Bytes) -> Self {
        let metadata = ObjectMetadata {
            content_length: content.len() as u64,
            ..Default::default()
        };

        Self {
            container: container.into(),
            key: key.into(),
            metadata,
            content,
        }
    }

    /// Replace the metadata.
    pub fn with_metadata(mut self, metadata: ObjectMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}
