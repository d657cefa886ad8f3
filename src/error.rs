//! Error types for the AulaSense service
//!
//! This module provides structured error definitions using thiserror, with
//! anyhow interop for the binary entry points.

use thiserror::Error;

/// Main error type for AulaSense operations
#[derive(Error, Debug)]
pub enum AulaSenseError {
    /// Connection pool or interaction failure
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite statement failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Required request input missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Username/password pair did not match a teacher
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Generation service answered with an error
    #[error("Generation service error: {0}")]
    Generation(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for AulaSense operations
pub type Result<T> = std::result::Result<T, AulaSenseError>;

/// Convert anyhow::Error to AulaSenseError
impl From<anyhow::Error> for AulaSenseError {
    fn from(err: anyhow::Error) -> Self {
        AulaSenseError::Other(err.to_string())
    }
}
