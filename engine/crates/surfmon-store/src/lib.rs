//! surfmon Store - Persistent snapshot cache
//!
//! Snapshots are kept as timestamped, numbered entries in a single JSON file.
//! Saving replaces the file atomically; purging keeps only the newest entries.

pub mod cache;
pub mod entry;

pub use cache::SnapshotStore;
pub use entry::CacheEntry;
