//! Error types for the history engine

use std::fmt;

use specflow_common::{impl_error_from, JsonStoreError};
use thiserror::Error;

/// Which end of the history a navigation ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Undo past the pristine baseline
    Undo,
    /// Redo past the newest patch
    Redo,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Undo => write!(f, "undo"),
            Direction::Redo => write!(f, "redo"),
        }
    }
}

/// Errors that can occur in the history engine
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Undo at the baseline or redo at the newest patch
    #[error("No more history to {direction}")]
    BoundaryReached {
        /// The navigation that was refused
        direction: Direction,
    },

    /// No patch with the given id
    #[error("Patch not found: {0}")]
    NotFound(String),

    /// Durable storage read or write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Data failed a consistency check
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl_error_from!(JsonStoreError => HistoryError::Persistence, |e| e.to_string());
impl_error_from!(config::ConfigError => HistoryError::Config, |e| e.to_string());

impl HistoryError {
    /// Create a BoundaryReached error for an undo at the baseline
    pub fn undo_boundary() -> Self {
        Self::BoundaryReached {
            direction: Direction::Undo,
        }
    }

    /// Create a BoundaryReached error for a redo at the newest patch
    pub fn redo_boundary() -> Self {
        Self::BoundaryReached {
            direction: Direction::Redo,
        }
    }

    /// Create a new NotFound error with context
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create a new Persistence error with context
    pub fn persistence_error(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a new Validation error with context
    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new Config error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the caller should treat this as a silent no-op
    ///
    /// Boundary and not-found results are expected during normal navigation;
    /// editors ignore them rather than surfacing an error.
    pub fn is_navigation_noop(&self) -> bool {
        matches!(self, Self::BoundaryReached { .. } | Self::NotFound(_))
    }
}

/// Result alias for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
