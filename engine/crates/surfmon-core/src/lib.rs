//! surfmon Core - Foundation types, traits, and error handling
//!
//! This crate provides the core abstractions used throughout surfmon:
//! - `Anomaly`: One observation produced by comparing two snapshots
//! - `Probe`: The trait that all attack-surface probes implement
//! - `Snapshot`: One run's raw probe output, keyed by probe name
//! - `Error`: The shared error type

pub mod anomaly;
pub mod error;
pub mod probe;
pub mod snapshot;

// Re-export commonly used types at crate root
pub use anomaly::{Anomaly, AnomalyKind};
pub use error::{Error, Result};
pub use probe::{CompareResult, Probe, ProbeDescriptor};
pub use snapshot::Snapshot;
