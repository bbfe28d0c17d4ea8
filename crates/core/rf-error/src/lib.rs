//! Error types and classification for rangeflow.
//!
//! This crate provides:
//! - [`RfError`] - Top-level error enum for planning and scanning
//! - Domain-specific errors ([`RemoteError`], [`CodecError`])
//! - [`ErrorCategory`] for retry decision making
//!
//! Running out of keys is never an error: listers and scanners signal
//! exhaustion with `Ok(None)`.

use thiserror::Error;

/// Top-level error type for rangeflow.
#[derive(Error, Debug)]
pub enum RfError {
    /// Invalid or conflicting configuration, raised before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors reported by the object store collaborator
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Split or key summary wire encoding errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RfError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Errors raised by the remote object store.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// A listing call failed
    #[error("List failed: {0}")]
    List(String),

    /// An object fetch failed
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The container or key does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials were rejected
    #[error("Access denied: {0}")]
    AccessDenied(String),
}

/// Wire codec errors.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Input ended in the middle of a field
    #[error("Unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    /// A string field was not valid UTF-8
    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// A varint decoded to a value outside the field's range
    #[error("Varint out of range for {field}: {value}")]
    VarintOutOfRange { field: &'static str, value: i64 },

    /// Reading or writing the underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error classification for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transient error - the exact same call may be retried
    ///
    /// Examples: network timeout, S3 503, throttling
    Transient,

    /// Permanent error - never retry
    ///
    /// Examples: bad configuration, missing bucket, access denied, corrupt frame
    Permanent,
}

/// Classifies an error to determine retry behavior.
pub fn classify_error(error: &RfError) -> ErrorCategory {
    match error {
        RfError::Config(_) => ErrorCategory::Permanent,
        RfError::Remote(e) => classify_remote_error(e),
        RfError::Codec(_) => ErrorCategory::Permanent,
        RfError::Other(e) => classify_message(&e.to_string()),
    }
}

fn classify_remote_error(error: &RemoteError) -> ErrorCategory {
    match error {
        RemoteError::List(message) | RemoteError::Fetch(message) => classify_message(message),
        RemoteError::NotFound(_) => ErrorCategory::Permanent,
        RemoteError::AccessDenied(_) => ErrorCategory::Permanent,
    }
}

/// Classify a raw error message from the object store.
///
/// Throttling, 5xx responses, timeouts and connection failures are transient.
/// Missing keys or buckets, access denied and other 4xx responses are permanent.
/// Anything unrecognised is treated as transient.
pub fn classify_message(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();

    if lower.contains("slowdown")
        || lower.contains("toomanyrequests")
        || lower.contains("throttl")
        || lower.contains("service unavailable")
        || lower.contains("500")
        || lower.contains("502")
        || lower.contains("503")
        || lower.contains("504")
        || lower.contains("timeout")
        || lower.contains("connection reset")
        || lower.contains("connection refused")
    {
        return ErrorCategory::Transient;
    }

    if lower.contains("nosuchkey")
        || lower.contains("nosuchbucket")
        || lower.contains("accessdenied")
        || lower.contains("invalidrequest")
        || lower.contains("403")
        || lower.contains("404")
        || lower.contains("400")
    {
        return ErrorCategory::Permanent;
    }

    ErrorCategory::Transient
}

/// Result type alias using RfError.
pub type Result<T> = std::result::Result<T, RfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_permanent() {
        let error = RfError::config("bucket name cannot be empty");
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);
        assert!(error.to_string().contains("bucket name cannot be empty"));
    }

    #[test]
    fn test_remote_list_throttling_is_transient() {
        let error = RfError::Remote(RemoteError::List("SlowDown: reduce request rate".into()));
        assert_eq!(classify_error(&error), ErrorCategory::Transient);
    }

    #[test]
    fn test_remote_missing_bucket_is_permanent() {
        let error = RfError::Remote(RemoteError::List("NoSuchBucket: gone".into()));
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);

        let error = RfError::Remote(RemoteError::NotFound("s3://b/k".into()));
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);
    }

    #[test]
    fn test_codec_error_is_permanent() {
        let error = RfError::Codec(CodecError::UnexpectedEof("container"));
        assert_eq!(classify_error(&error), ErrorCategory::Permanent);
        assert_eq!(
            error.to_string(),
            "Codec error: Unexpected end of input while reading container"
        );
    }

    #[test]
    fn test_classify_message() {
        assert_eq!(classify_message("503 Service Unavailable"), ErrorCategory::Transient);
        assert_eq!(classify_message("Connection timeout"), ErrorCategory::Transient);
        assert_eq!(classify_message("AccessDenied"), ErrorCategory::Permanent);
        assert_eq!(classify_message("404 Not Found"), ErrorCategory::Permanent);
        assert_eq!(classify_message("something odd"), ErrorCategory::Transient);
    }
}
