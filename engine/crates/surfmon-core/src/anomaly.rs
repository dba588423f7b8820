//! Anomaly kinds and values

use serde::{Deserialize, Serialize};

/// Kind of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    /// A detected, meaningful difference between two snapshots
    Change,
    /// Something the user should know about that is not itself a change
    Warning,
    /// Low-priority diagnostic, hidden by default
    Debug,
}

impl AnomalyKind {
    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::Change => "change",
            AnomalyKind::Warning => "warning",
            AnomalyKind::Debug => "debug",
        }
    }
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported observation.
///
/// Fields are private so an anomaly cannot be altered after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    kind: AnomalyKind,
    message: String,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a `Change` anomaly
    pub fn change(message: impl Into<String>) -> Self {
        Self::new(AnomalyKind::Change, message)
    }

    /// Shorthand for a `Warning` anomaly
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(AnomalyKind::Warning, message)
    }

    /// Shorthand for a `Debug` anomaly
    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(AnomalyKind::Debug, message)
    }

    pub fn kind(&self) -> AnomalyKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_change(&self) -> bool {
        self.kind == AnomalyKind::Change
    }

    pub fn is_warning(&self) -> bool {
        self.kind == AnomalyKind::Warning
    }

    pub fn is_debug(&self) -> bool {
        self.kind == AnomalyKind::Debug
    }
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
