//! Index types and results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Which index to build for a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Index the spoken words of the transcript
    #[default]
    SpokenWord,
    /// Index visual scenes
    Scene,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::SpokenWord => "spoken_word",
            IndexType::Scene => "scene",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IndexType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spoken_word" | "spoken" => Ok(IndexType::SpokenWord),
            "scene" => Ok(IndexType::Scene),
            other => Err(ModelError::UnknownIndexType(other.to_string())),
        }
    }
}

/// Response of the index request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Value delivered when an index job completes.
///
/// `message` only appears when the server reported the index as not built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<IndexResponse> for IndexOutcome {
    fn from(response: IndexResponse) -> Self {
        let success = response.success.unwrap_or(true);
        let message = if success {
            None
        } else {
            response.message.filter(|m| !m.is_empty())
        };
        Self { success, message }
    }
}
