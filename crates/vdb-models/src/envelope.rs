//! Terminal payload envelope and accepted-operation responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a failed envelope carries none.
pub const DEFAULT_FAILURE_MESSAGE: &str = "job failed";

/// Optional wrapper around a terminal payload.
///
/// `{ "success": false, "message": "..." }` reports an explicit failure,
/// `{ "success": true, "data": {...} }` wraps the real payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Result of looking through an optional envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Unwrapped {
    /// The payload to finalize (inner `data` or the bare payload)
    Data(Value),
    /// Server-reported failure with its message
    Failure(String),
}

impl Envelope {
    /// Detect an envelope: an object whose `success` key holds a boolean.
    pub fn detect(payload: &Value) -> Option<Self> {
        let obj = payload.as_object()?;
        let success = obj.get("success")?.as_bool()?;
        Some(Self {
            success,
            message: obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            data: obj.get("data").cloned(),
        })
    }

    /// Unwrap a terminal payload whether or not it is enveloped.
    pub fn unwrap_payload(payload: Value) -> Unwrapped {
        match Self::detect(&payload) {
            Some(Envelope { success: false, message, .. }) => Unwrapped::Failure(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ),
            Some(Envelope { data, .. }) => Unwrapped::Data(data.unwrap_or(Value::Null)),
            None => Unwrapped::Data(payload),
        }
    }
}

/// "Operation accepted" response: names the endpoint to poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    pub output_url: String,
}

impl Accepted {
    /// Extract the callback endpoint from a normalized payload, if any.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        payload
            .get("output_url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(|url| Self {
                output_url: url.to_string(),
            })
    }
}
