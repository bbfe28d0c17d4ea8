//! Core traits for rangeflow.
//!
//! The object store is an injected capability rather than a global client:
//! - [`ObjectLister`] - Paged, ordered key listing
//! - [`ObjectFetcher`] - Single object retrieval
//!
//! [`MemoryStore`] implements both over an in-memory key space for
//! development and deterministic tests.

pub mod memory;
pub mod store;

pub use memory::*;
pub use store::*;
