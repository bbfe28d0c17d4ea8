//! Statistics for planning and scanning runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Statistics collected while planning splits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanStats {
    /// When planning started
    pub started_at: Option<DateTime<Utc>>,

    /// When planning completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Listing pages fetched, counting pass included
    pub pages_fetched: u64,

    /// Keys seen by the planning pass
    pub keys_listed: u64,

    /// Number of splits produced
    pub splits_planned: usize,

    /// Keys that did not sort after their predecessor
    pub ordering_violations: u64,
}

impl PlanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark planning as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record a fetched page and the keys it contributed.
    pub fn record_page(&mut self, keys: u64) {
        self.pages_fetched += 1;
        self.keys_listed += keys;
    }

    /// Get the duration of the planning run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// Statistics collected while scanning splits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// When scanning started
    pub started_at: Option<DateTime<Utc>>,

    /// When scanning completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Splits scanned to completion
    pub splits_scanned: usize,

    /// Splits abandoned after an error
    pub splits_failed: usize,

    /// Keys yielded across all splits
    pub keys_scanned: u64,

    /// Listed size of the keys yielded
    pub bytes_scanned: u64,

    /// Objects whose content was fetched
    pub objects_fetched: u64,

    /// Keys that did not sort after their predecessor
    pub ordering_violations: u64,

    /// Errors encountered while scanning
    pub errors: Vec<String>,
}

impl ScanStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark scanning as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record a split that was scanned to the end.
    pub fn record_split(&mut self, keys: u64, bytes: u64, objects_fetched: u64) {
        self.splits_scanned += 1;
        self.keys_scanned += keys;
        self.bytes_scanned += bytes;
        self.objects_fetched += objects_fetched;
    }

    /// Record a split that failed.
    pub fn record_error(&mut self, error: impl ToString) {
        self.splits_failed += 1;
        self.errors.push(error.to_string());
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get the duration of the scanning run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Calculate the throughput in keys per second.
    pub fn keys_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.keys_scanned as f64 / secs
            } else {
                0.0
            }
        })
    }
}
