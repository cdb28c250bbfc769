//! Error types for the analysis toolkit

use thiserror::Error;

/// Result type for toolkit operations
pub type Result<T> = std::result::Result<T, NlpError>;

/// Errors raised while loading resources or analysing text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NlpError {
    /// Text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    EmptyInput,

    /// Language resources could not be loaded (missing directory or file)
    #[error("NLP resources unavailable: {0}")]
    ModelUnavailable(String),

    /// A resource file was present but could not be parsed
    #[error("Malformed resource {file} line {line}: {reason}")]
    Resource {
        file: String,
        line: usize,
        reason: String,
    },
}

impl NlpError {
    /// True for failures caused by the toolkit's data rather than the caller's input
    pub fn is_unavailable(&self) -> bool {
        matches!(self, NlpError::ModelUnavailable(_) | NlpError::Resource { .. })
    }
}
