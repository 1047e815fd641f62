// CLI error types

use specflow_history::HistoryError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Invalid collection in {path}: {message}")]
    InvalidCollection { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<HistoryError> for CliError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Config(msg) => CliError::Config(msg),
            HistoryError::Persistence(msg) => CliError::Storage(msg),
            HistoryError::Validation(msg) => CliError::Storage(format!("stored history is invalid: {}", msg)),
            HistoryError::Io(e) => CliError::Io(e),
            other => CliError::Internal(other.to_string()),
        }
    }
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {}\n\nRun 'specflow --help' for usage information.", message)
            }
            CliError::InvalidCollection { path, message } => {
                format!(
                    "Could not read agents from {}: {}\n\nThe file must contain a JSON array of agents.",
                    path, message
                )
            }
            CliError::Io(e) => {
                format!("File operation failed: {}", e)
            }
            CliError::Config(msg) => {
                format!("Configuration error: {}\n\nCheck your config file or SPECFLOW_* environment variables.", msg)
            }
            CliError::Storage(msg) => {
                format!("Storage error: {}\n\nRun 'specflow clear' to start a fresh history.", msg)
            }
            CliError::Internal(msg) => {
                format!("Internal error: {}\n\nPlease report this issue.", msg)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
