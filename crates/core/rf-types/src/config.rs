//! Planning and scanning configuration.

use rf_error::{Result, RfError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default number of keys requested per listing call.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Configuration for a planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Bucket to plan over (required, non-empty)
    pub container: String,

    /// Key prefix to plan under (empty = whole bucket)
    #[serde(default)]
    pub key_prefix: String,

    /// Keys requested per listing call
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Desired keys per split
    #[serde(default)]
    pub split_size: Option<u32>,

    /// Desired number of splits (takes precedence over `split_size`)
    #[serde(default)]
    pub split_count: Option<u32>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// How a planning run sizes its splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSizing {
    /// Fixed number of keys per split
    BySize(u32),

    /// Fixed number of splits; the size is derived from a counting pass
    ByCount(u32),
}

impl PlannerConfig {
    /// Create a configuration for the given bucket with defaults.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            key_prefix: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            split_size: None,
            split_count: None,
        }
    }

    /// Set the key prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the number of keys per split.
    pub fn with_split_size(mut self, split_size: u32) -> Self {
        self.split_size = Some(split_size);
        self
    }

    /// Set the number of splits.
    pub fn with_split_count(mut self, split_count: u32) -> Self {
        self.split_count = Some(split_count);
        self
    }

    /// Validate the configuration and decide how splits are sized.
    ///
    /// Split count wins when both sizing options are set. With neither set,
    /// a single split covering the whole key space is planned.
    pub fn resolve(&self) -> Result<SplitSizing> {
        if self.container.is_empty() {
            return Err(RfError::config("bucket name cannot be empty"));
        }

        if self.page_size == 0 {
            return Err(RfError::config("page size must be at least 1"));
        }

        let sizing = match (self.split_count, self.split_size) {
            (Some(count), Some(size)) => {
                warn!(
                    split_count = count,
                    split_size = size,
                    "Both split count and split size are set, using split count"
                );
                SplitSizing::ByCount(count)
            }
            (Some(count), None) => SplitSizing::ByCount(count),
            (None, Some(size)) => SplitSizing::BySize(size),
            (None, None) => {
                warn!("Neither split count nor split size is set, defaulting to one split");
                SplitSizing::ByCount(1)
            }
        };

        match sizing {
            SplitSizing::BySize(0) => Err(RfError::config("split size must be at least 1")),
            SplitSizing::ByCount(0) => Err(RfError::config("split count must be at least 1")),
            sizing => Ok(sizing),
        }
    }
}

/// Configuration for scanning a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Keys requested per listing call
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
