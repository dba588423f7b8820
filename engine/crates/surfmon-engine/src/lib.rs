//! surfmon Engine - Structured snapshot diffing and run orchestration
//!
//! - [`DiffEngine`] turns two snapshots into an ordered list of anomalies by
//!   dispatching each probe's capture to the registered probe
//! - [`Session`] implements the tool's invocation modes on top of the engine,
//!   the snapshot store and a collector

pub mod diff;
pub mod error;
pub mod report;
pub mod session;

pub use diff::{DiffAbort, DiffEngine, ProbeFilter};
pub use error::{EngineError, EngineResult};
pub use report::Report;
pub use session::Session;
