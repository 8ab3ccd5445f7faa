//! Error types for airprox

use std::fmt;
use thiserror::Error;

/// Which external collaborator rejected an emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Notification,
    Analytics,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkKind::Notification => write!(f, "notification"),
            SinkKind::Analytics => write!(f, "analytics"),
        }
    }
}

/// Closed failure taxonomy of the proximity engine.
///
/// Every boundary that logs or reports one of these matches it exhaustively,
/// so adding a variant is a deliberate breaking change.
#[derive(Debug, Error)]
pub enum ProximityError {
    /// The point-of-interest dataset could not be retrieved at all
    #[error("Dataset unreachable ({source_name}): {reason}")]
    DatasetUnreachable { source_name: String, reason: String },

    /// A single dataset record was rejected; recovered by dropping the record
    #[error("Malformed dataset record #{record_index}: {reason}")]
    DatasetMalformed { record_index: usize, reason: String },

    /// The notification or analytics sink rejected an emit
    #[error("{sink} sink failed: {reason}")]
    SinkFailure { sink: SinkKind, reason: String },

    /// Persisted state could not be read or written
    #[error("Storage failure for key '{key}': {reason}")]
    StorageFailure { key: String, reason: String },
}

impl ProximityError {
    pub fn storage(key: impl Into<String>, reason: impl fmt::Display) -> Self {
        ProximityError::StorageFailure { key: key.into(), reason: reason.to_string() }
    }

    pub fn sink(sink: SinkKind, reason: impl fmt::Display) -> Self {
        ProximityError::SinkFailure { sink, reason: reason.to_string() }
    }

    /// Whether the invocation that produced this error must stop without emitting
    pub fn is_fatal(&self) -> bool {
        match self {
            ProximityError::DatasetUnreachable { .. } => true,
            ProximityError::StorageFailure { .. } => true,
            ProximityError::DatasetMalformed { .. } => false,
            ProximityError::SinkFailure { .. } => false,
        }
    }
}

/// Configuration errors, kept apart from the engine taxonomy
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ProximityError>;
