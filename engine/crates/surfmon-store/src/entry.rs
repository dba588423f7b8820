//! Cache entry records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surfmon_core::Snapshot;

/// One persisted snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Assigned at append time, strictly increasing within a store
    pub id: u64,

    /// When the entry was appended
    pub timestamp: DateTime<Utc>,

    /// Raw probe output
    pub snapshot: Snapshot,
}

impl CacheEntry {
    pub fn new(id: u64, timestamp: DateTime<Utc>, snapshot: Snapshot) -> Self {
        Self {
            id,
            timestamp,
            snapshot,
        }
    }
}
