//! Error types for the RL core library

use thiserror::Error;

/// Core error type for RL operations
#[derive(Error, Debug)]
pub enum RLError {
    /// Environment-related errors (unknown ids, bad construction parameters)
    #[error("Environment error: {0}")]
    Environment(String),

    /// Action outside the declared action space
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Operation not valid in the current environment state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected number of elements
        expected: usize,
        /// Number of elements actually supplied
        actual: usize,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RLError {
    /// Whether this error rejected an action without touching environment state
    #[must_use]
    pub fn is_invalid_action(&self) -> bool {
        matches!(self, Self::InvalidAction(_))
    }

    /// Whether this error reports a lifecycle violation (e.g. step before reset)
    #[must_use]
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

/// Result type alias for RL operations
pub type Result<T> = std::result::Result<T, RLError>;
