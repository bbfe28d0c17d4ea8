//! rf-s3 - AWS S3 object store for rangeflow.
//!
//! Provides [`S3Store`], an [`ObjectLister`](rf_traits::ObjectLister) and
//! [`ObjectFetcher`](rf_traits::ObjectFetcher) over ListObjects and GetObject,
//! plus client construction with LocalStack support and retry with backoff.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rf_planner::SplitPlanner;
//! use rf_s3::{S3Config, S3Store};
//! use rf_types::PlannerConfig;
//!
//! let s3_config = S3Config::new("my-bucket").with_endpoint("http://localhost:4566");
//! let store = Arc::new(S3Store::from_config(&s3_config).await?);
//!
//! let config = PlannerConfig::new("my-bucket").with_split_count(16);
//! let splits = SplitPlanner::new(store, config).plan().await?;
//! ```

mod client;
mod retry;
mod store;

pub use client::{S3Config, create_s3_client};
pub use retry::{RetryConfig, with_retry};
pub use store::S3Store;
