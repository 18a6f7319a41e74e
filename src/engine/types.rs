//! Engine types
//!
//! Drain results and statistics.

use crate::types::Record;

/// Result of draining one collection
#[derive(Debug, Clone)]
pub struct Drain {
    /// Every record, in server delivery order
    pub records: Vec<Record>,
    /// What the drain took
    pub stats: DrainStats,
}

/// Statistics from a drain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainStats {
    /// Requests issued
    pub pages: usize,
    /// Records received
    pub records: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl DrainStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages += 1;
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records += count;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
