//! Split descriptors produced by planning and consumed by scanners.

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use rf_error::CodecError;
use serde::{Deserialize, Serialize};

use crate::codec::{read_frame, read_string, read_vu32, write_frame, write_string, write_vlong};

/// A contiguous range of keys under a prefix.
///
/// The range is `(start_marker, end_key_inclusive]`: the marker itself is not
/// part of the split, the end key is. Splits from one planning run are
/// contiguous, so each split's marker is the previous split's end key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Bucket name
    pub container: String,

    /// Prefix the planning run listed under (empty = whole bucket)
    pub key_prefix: String,

    /// Exclusive lower bound (`None` for the first split)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_marker: Option<String>,

    /// Last key included in the split
    pub end_key_inclusive: String,

    /// Number of keys in the split at planning time (0 = unknown)
    #[serde(default)]
    pub approx_size: u32,
}

impl Split {
    pub fn new(
        container: impl Into<String>,
        key_prefix: impl Into<String>,
        start_marker: Option<String>,
        end_key_inclusive: impl Into<String>,
        approx_size: u32,
    ) -> Self {
        Self {
            container: container.into(),
            key_prefix: key_prefix.into(),
            start_marker,
            end_key_inclusive: end_key_inclusive.into(),
            approx_size,
        }
    }

    /// Whether `key` lies inside `(start_marker, end_key_inclusive]`.
    pub fn contains(&self, key: &str) -> bool {
        let after_start = self
            .start_marker
            .as_deref()
            .is_none_or(|marker| key > marker);

        after_start && !self.is_past_end(key)
    }

    /// Whether `key` sorts after the split's end key.
    pub fn is_past_end(&self, key: &str) -> bool {
        key > self.end_key_inclusive.as_str()
    }

    /// Encode the split.
    ///
    /// Field order: container, prefix, marker (empty = none), end key, size.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        write_string(buf, &self.container);
        write_string(buf, &self.key_prefix);
        write_string(buf, self.start_marker.as_deref().unwrap_or(""));
        write_string(buf, &self.end_key_inclusive);
        write_vlong(buf, self.approx_size as i64);
    }

    /// Decode a split written by [`Split::encode`].
    ///
    /// Frames from older writers end after the end key; those decode with
    /// `approx_size = 0`.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, CodecError> {
        let container = read_string(buf, "container")?;
        let key_prefix = read_string(buf, "key_prefix")?;
        let start_marker = read_string(buf, "start_marker")?;
        let end_key_inclusive = read_string(buf, "end_key_inclusive")?;

        let approx_size = if buf.has_remaining() {
            read_vu32(buf, "approx_size")?
        } else {
            0
        };

        Ok(Self {
            container,
            key_prefix,
            start_marker: (!start_marker.is_empty()).then_some(start_marker),
            end_key_inclusive,
            approx_size,
        })
    }

    /// Encode the split as a standalone byte buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Container={}, Prefix={}, Marker={}, LastKey={}, Size={}]",
            self.container,
            self.key_prefix,
            self.start_marker.as_deref().unwrap_or("<none>"),
            self.end_key_inclusive,
            self.approx_size
        )
    }
}

/// Encode a sequence of splits as length-prefixed frames.
pub fn encode_split_frames<'a>(splits: impl IntoIterator<Item = &'a Split>) -> Bytes {
    let mut buf = BytesMut::new();
    for split in splits {
        write_frame(&mut buf, &split.to_bytes());
    }
    buf.freeze()
}

/// Decode every framed split in `bytes`.
pub fn decode_split_frames(mut bytes: Bytes) -> Result<Vec<Split>, CodecError> {
    let mut splits = Vec::new();
    while let Some(mut frame) = read_frame(&mut bytes)? {
        splits.push(Split::decode(&mut frame)?);
    }
    Ok(splits)
}
