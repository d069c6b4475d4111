//! Engine types
//!
//! Run settings and statistics for the sync engine.

use crate::config::TapConfig;
use crate::error::Result;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::schema::Stream;
use std::collections::BTreeMap;

/// Configuration for a sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Items requested per page
    pub page_size: u32,
    /// Bootstrap lower bound for the review window (Unix seconds)
    pub start_date: Option<i64>,
    /// Whether to fetch the per-hotel reviews snapshot
    pub sync_snapshots: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            start_date: None,
            sync_snapshots: true,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings for a validated tap config
    pub fn from_tap_config(config: &TapConfig) -> Result<Self> {
        Ok(Self::new().with_start_date(config.start_timestamp()?))
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the bootstrap start date
    #[must_use]
    pub fn with_start_date(mut self, start_date: i64) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Enable or disable snapshot sub-sync
    #[must_use]
    pub fn with_snapshots(mut self, enabled: bool) -> Self {
        self.sync_snapshots = enabled;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records emitted per stream
    pub records: BTreeMap<&'static str, usize>,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Non-fatal fetch failures
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one emitted record
    pub fn add_record(&mut self, stream: Stream) {
        *self.records.entry(stream.name()).or_default() += 1;
    }

    /// Records emitted for a stream
    pub fn records_for(&self, stream: Stream) -> usize {
        self.records.get(stream.name()).copied().unwrap_or(0)
    }

    /// Records emitted across all streams
    pub fn total_records(&self) -> usize {
        self.records.values().sum()
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
