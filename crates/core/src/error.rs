//! Error types for promptsync.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! prompt loading, validation and registry failures.

use thiserror::Error;

/// Unified error type for promptsync.
///
/// All fallible functions return `Result<T, AppError>`. Every variant is
/// terminal for the invocation that produced it.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing environment values, bad config files, bad log filters
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Prompt file missing, malformed or of the wrong shape
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Prompt record failed one or more validation rules
    #[error("Validation failed with {} violation(s)", .0.len())]
    Validation(Vec<String>),

    /// Remote registry errors (auth, not found, permission, transport)
    #[error("Registry error: {0}")]
    Registry(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Whether the error came from the remote registry.
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Registry(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
