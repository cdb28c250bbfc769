//! Common error types for TextScope

use thiserror::Error;

/// Common result type for TextScope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the TextScope crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Named record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected operator or request input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
