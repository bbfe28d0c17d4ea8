//! rf-planner - listing-driven split planning for rangeflow.
//!
//! A bucket prefix is cut into contiguous key ranges by a single ordered
//! listing pass; each range can then be re-listed independently:
//!
//! - [`PaginatedLister`] - Lazy, cursor-driven iteration over a paged listing
//! - [`SplitPlanner`] - Splits of a fixed key count, or a fixed number of splits
//! - [`RangeScanner`] - Re-lists exactly the keys of one split
//! - [`ObjectReader`] - Pairs each scanned key with its fetched content
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rf_planner::{RangeScanner, SplitPlanner};
//! use rf_traits::MemoryStore;
//! use rf_types::{PlannerConfig, ScanConfig};
//!
//! let store = Arc::new(MemoryStore::new());
//! store.put_numbered("my-bucket", "logs/", 1000, 4);
//!
//! let config = PlannerConfig::new("my-bucket")
//!     .with_prefix("logs/")
//!     .with_split_size(100);
//! let splits = SplitPlanner::new(store.clone(), config).plan().await?;
//!
//! for split in splits {
//!     let mut scanner = RangeScanner::new(store.clone(), split, ScanConfig::default());
//!     while let Some(key) = scanner.next().await? {
//!         println!("{}", key.location());
//!     }
//! }
//! ```

pub mod lister;
pub mod planner;
pub mod reader;
pub mod scanner;
pub mod stats;

pub use lister::PaginatedLister;
pub use planner::SplitPlanner;
pub use reader::ObjectReader;
pub use scanner::RangeScanner;
pub use stats::{PlanStats, ScanStats};
