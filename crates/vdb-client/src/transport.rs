//! Transport seam between jobs and the remote API.

use async_trait::async_trait;
use serde_json::Value;
use vdb_models::JobStatus;

use crate::error::VdbResult;

/// A decoded API response: the status marker plus the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: Option<JobStatus>,
    pub data: Value,
}

impl ApiResponse {
    /// Create a response from its parts.
    pub fn new(status: Option<JobStatus>, data: Value) -> Self {
        Self { status, data }
    }

    /// A response still reporting `in_progress`.
    pub fn in_progress() -> Self {
        Self::new(Some(JobStatus::InProgress), Value::Null)
    }

    /// A response without a status marker.
    pub fn terminal(data: Value) -> Self {
        Self::new(None, data)
    }

    /// Split a JSON body into status and payload.
    ///
    /// The payload is the body's `data` field when present, otherwise the
    /// whole body. A body reporting `success: false` is kept whole so the
    /// failure message survives.
    pub fn from_body(body: Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(JobStatus::parse);
        let failed = body.get("success").and_then(Value::as_bool) == Some(false);

        let data = match body {
            Value::Object(mut map) if !failed && map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };
        Self { status, data }
    }

    /// Whether the operation is still running.
    pub fn is_pending(&self) -> bool {
        self.status.as_ref().is_some_and(JobStatus::is_pending)
    }
}

/// HTTP operations a job needs.
///
/// `path` is an ordered list of segments. A segment starting with `?` is a
/// literal query suffix and a leading absolute URL (a callback endpoint) is
/// used as-is; joining is up to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &[&str]) -> VdbResult<ApiResponse>;

    async fn post(&self, path: &[&str], body: Value) -> VdbResult<ApiResponse>;
}

/// Join path segments onto a base URL.
pub fn join_path(base_url: &str, segments: &[&str]) -> String {
    let mut segments = segments.iter().copied().filter(|s| !s.is_empty());
    let mut url = match segments.next() {
        Some(first) if is_absolute(first) => first.trim_end_matches('/').to_string(),
        Some(first) => {
            let mut url = base_url.trim_end_matches('/').to_string();
            push_segment(&mut url, first);
            url
        }
        None => return base_url.trim_end_matches('/').to_string(),
    };
    for segment in segments {
        push_segment(&mut url, segment);
    }
    url
}

fn is_absolute(segment: &str) -> bool {
    segment.starts_with("http://") || segment.starts_with("https://")
}

fn push_segment(url: &mut String, segment: &str) {
    if segment.starts_with('?') || segment.starts_with('&') {
        url.push_str(segment);
    } else {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
}
