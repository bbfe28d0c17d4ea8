//! Key summaries returned by bucket listings.

use std::cmp::Ordering;

use bytes::{Buf, BufMut};
use chrono::{DateTime, Utc};
use rf_error::CodecError;
use serde::{Deserialize, Serialize};

use crate::codec::{read_string, write_string};

/// One entry of an ordered bucket listing.
///
/// Listings are ordered by `(container, key)`; use [`KeySummary::position_cmp`]
/// to compare two summaries by listing position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySummary {
    /// Bucket the key lives in
    pub container: String,

    /// Full object key
    pub key: String,

    /// Object size in bytes
    pub size: u64,

    /// Content hash reported by the store (the S3 ETag)
    #[serde(default)]
    pub content_hash: String,

    /// Storage class reported by the store
    #[serde(default)]
    pub storage_class: String,

    /// Last modified timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Object owner, when the listing includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

/// Owner of an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: String,
    pub display_name: String,
}

impl Owner {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl KeySummary {
    /// Create a summary with the required fields.
    pub fn new(container: impl Into<String>, key: impl Into<String>, size: u64) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
            size,
            content_hash: String::new(),
            storage_class: String::new(),
            last_modified: None,
            owner: None,
        }
    }

    /// Set the content hash.
    pub fn with_content_hash(mut self, content_hash: impl Into<String>) -> Self {
        self.content_hash = content_hash.into();
        self
    }

    /// Set the storage class.
    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = storage_class.into();
        self
    }

    /// Set the last modified timestamp.
    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Compare two summaries by listing position, `(container, key)`.
    pub fn position_cmp(&self, other: &Self) -> Ordering {
        self.container
            .cmp(&other.container)
            .then_with(|| self.key.cmp(&other.key))
    }

    /// `container/key`, the record key used by scanners.
    pub fn location(&self) -> String {
        format!("{}/{}", self.container, self.key)
    }

    /// Encode the summary.
    ///
    /// Only container, key, content hash, storage class and size are carried.
    /// Timestamp and owner are dropped.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        write_string(buf, &self.container);
        write_string(buf, &self.key);
        write_string(buf, &self.content_hash);
        write_string(buf, &self.storage_class);
        buf.put_i64(self.size as i64);
    }

    /// Decode a summary written by [`KeySummary::encode`].
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, CodecError> {
        let container = read_string(buf, "container")?;
        let key = read_string(buf, "key")?;
        let content_hash = read_string(buf, "content_hash")?;
        let storage_class = read_string(buf, "storage_class")?;

        if buf.remaining() < 8 {
            return Err(CodecError::UnexpectedEof("size"));
        }
        let size = buf.get_i64();
        let size = u64::try_from(size).map_err(|_| CodecError::VarintOutOfRange {
            field: "size",
            value: size,
        })?;

        Ok(Self {
            container,
            key,
            size,
            content_hash,
            storage_class,
            last_modified: None,
            owner: None,
        })
    }
}
