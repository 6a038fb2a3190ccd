//! Client error types.

use thiserror::Error;
use vdb_models::ModelError;

/// Result type for client operations.
pub type VdbResult<T> = Result<T, VdbError>;

/// Message of the error delivered when polling reaches the delay ceiling.
pub const JOB_TIMED_OUT: &str = "job timed out";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while submitting or polling a job.
///
/// Only `Authentication`, `InvalidRequest`, `Service` and `Unknown` ever
/// reach an error callback; the remaining variants are wrapped into
/// `Unknown` by [`VdbError::classify`].
#[derive(Debug, Error)]
pub enum VdbError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Service(String),

    #[error("Unknown error: {message}")]
    Unknown {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VdbError {
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn timed_out() -> Self {
        Self::Service(JOB_TIMED_OUT.to_string())
    }

    /// Map a non-success HTTP status to an error kind.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Authentication(message),
            400 | 404 | 409 | 422 => Self::InvalidRequest(message),
            500..=599 => Self::Service(message),
            _ => Self::Unknown {
                message: format!("HTTP {status}: {message}"),
                source: None,
            },
        }
    }

    /// True for the kinds delivered to callers without wrapping.
    pub fn is_recognized(&self) -> bool {
        matches!(
            self,
            VdbError::Authentication(_)
                | VdbError::InvalidRequest(_)
                | VdbError::Service(_)
                | VdbError::Unknown { .. }
        )
    }

    /// Wrap any unrecognized error into `Unknown`, keeping it as the source.
    pub fn classify(self) -> Self {
        if self.is_recognized() {
            return self;
        }
        Self::Unknown {
            message: self.to_string(),
            source: Some(Box::new(self)),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, VdbError::Service(msg) if msg == JOB_TIMED_OUT)
    }
}

impl From<ModelError> for VdbError {
    fn from(e: ModelError) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}
