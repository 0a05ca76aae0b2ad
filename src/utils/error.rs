//! Error types and handling
//!
//! Everything fallible in this crate funnels into [`AppError`]. Variants are
//! grouped by how callers are expected to react: absence, bad input,
//! integrity conflicts, or infrastructure failure. Lookup paths that
//! deliberately tolerate absence return `Ok(None)` instead of `NotFound`;
//! the variant exists for the `sqlx::Error::RowNotFound` conversion and for
//! hosts that want to raise it themselves.

use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A caller-supplied argument the operation cannot work with
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Field constraints were violated
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness or state conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// Implement From for common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => AppError::Conflict(db_err.to_string()),
                _ => AppError::Database(db_err.to_string()),
            },
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias used throughout the repositories
pub type AppResult<T> = Result<T, AppError>;
