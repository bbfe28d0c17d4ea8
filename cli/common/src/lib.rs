//! Shared utilities for rangeflow CLI binaries.
//!
//! Used by `rf-planner` and `rf-scanner` for S3 connection flags, logging
//! setup and human-readable summaries.

pub mod args;
pub mod format;
pub mod logging;

pub use args::{LogLevel, S3Args, parse_positive_u32, parse_positive_usize};
pub use format::{format_bytes, format_duration_ms, format_number};
pub use logging::init_logging;
