//! surfmon Probes - Probe registry and the built-in probe set
//!
//! This crate provides:
//! - `ProbeRegistry`: Lookup table from probe name to probe
//! - The built-in probes (users, kernel modules, listening sockets, mounts, ...)
//! - `Records`: Keyed, ordered line records shared by the line-oriented probes

pub mod probes;
pub mod records;
pub mod registry;

pub use records::{RecordDiff, Records};
pub use registry::ProbeRegistry;
