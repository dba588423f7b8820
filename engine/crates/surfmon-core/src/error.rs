//! Error types for surfmon

use thiserror::Error;

/// Result type alias using surfmon Error
pub type Result<T> = std::result::Result<T, Error>;

/// surfmon error types
#[derive(Error, Debug)]
pub enum Error {
    // === Probe Errors ===
    #[error("Probe already registered: {name}")]
    DuplicateProbe { name: String },

    #[error("Probe contract violated by {probe}: {message}")]
    ProbeContract { probe: String, message: String },

    #[error("No output captured for probe {probe} in the newer snapshot")]
    MissingProbeOutput { probe: String },

    // === Collection Errors ===
    #[error("Collection failed: {0}")]
    Collection(String),

    // === Cache Errors ===
    #[error("Cannot find cache entry with id {id}")]
    EntryNotFound { id: u64 },

    #[error("Cache file {path} is corrupt: {message}")]
    CacheCorrupt { path: String, message: String },

    #[error("Cache file {path} has used up every entry id")]
    IdsExhausted { path: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get an error code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Error::DuplicateProbe { .. } => "DUPLICATE_PROBE",
            Error::ProbeContract { .. } => "PROBE_CONTRACT",
            Error::MissingProbeOutput { .. } => "MISSING_PROBE_OUTPUT",
            Error::Collection(_) => "COLLECTION_FAILED",
            Error::EntryNotFound { .. } => "ENTRY_NOT_FOUND",
            Error::CacheCorrupt { .. } => "CACHE_CORRUPT",
            Error::IdsExhausted { .. } => "IDS_EXHAUSTED",
            Error::Configuration(_) => "CONFIG_ERROR",
            Error::InvalidConfig { .. } => "INVALID_CONFIG",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
