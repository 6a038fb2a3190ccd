//! Model error types.

use thiserror::Error;

/// Result type for model construction and parsing.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unknown index type: {0}")]
    UnknownIndexType(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl ModelError {
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }
}
