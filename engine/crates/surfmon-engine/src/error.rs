//! Errors surfaced by engine operations

use crate::diff::DiffAbort;
use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Store, collector or lookup failure
    #[error(transparent)]
    Core(#[from] surfmon_core::Error),

    /// A probe broke its contract mid-comparison
    #[error(transparent)]
    Aborted(#[from] DiffAbort),
}

impl EngineError {
    /// Anomalies gathered before a comparison aborted, if any
    pub fn partial_anomalies(&self) -> &[surfmon_core::Anomaly] {
        match self {
            EngineError::Aborted(abort) => &abort.anomalies,
            EngineError::Core(_) => &[],
        }
    }

    /// Code of the underlying error, for logs
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Core(err) => err.code(),
            EngineError::Aborted(abort) => abort.source.code(),
        }
    }
}
