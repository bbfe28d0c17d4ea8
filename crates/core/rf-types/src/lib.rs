//! Core types for rangeflow.
//!
//! This crate provides the value types exchanged between the planner, the
//! scanners and the object store:
//! - [`KeySummary`] - One entry of an ordered bucket listing
//! - [`Page`] / [`ListRequest`] - One listing call and its result
//! - [`Split`] - A contiguous `(start_marker, end_key_inclusive]` key range
//! - [`StoredObject`] - Fetched object content and metadata
//! - [`PlannerConfig`] / [`ScanConfig`] - Planning and scanning settings
//!
//! The [`codec`] module implements the binary wire format used to hand
//! splits and key summaries between processes.

pub mod codec;
pub mod config;
pub mod key;
pub mod object;
pub mod page;
pub mod split;

pub use config::*;
pub use key::*;
pub use object::*;
pub use page::*;
pub use split::*;
