//! Status vocabulary reported by the remote service while a job runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status value carried next to every response payload.
///
/// Only the two pending markers are meaningful to the poller; any other
/// value (or no value at all) means the operation has reached a terminal
/// state and the payload should be inspected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Operation accepted and still running
    InProgress,
    /// Operation running a processing stage
    Processing,
    /// Any terminal or unrecognized status
    Other(String),
}

impl JobStatus {
    /// Parse a wire status. Matching is case-insensitive and accepts the
    /// legacy space-separated spelling of `in_progress`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "in_progress" | "in progress" => JobStatus::InProgress,
            "processing" => JobStatus::Processing,
            _ => JobStatus::Other(raw.to_string()),
        }
    }

    /// Status of a response that may not carry one.
    pub fn from_wire(raw: Option<&str>) -> Option<Self> {
        raw.map(Self::parse)
    }

    /// Whether the operation has not finished yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::InProgress | JobStatus::Processing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::InProgress => "in_progress",
            JobStatus::Processing => "processing",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_markers() {
        assert!(JobStatus::parse("in_progress").is_pending());
        assert!(JobStatus::parse("processing").is_pending());
        assert!(JobStatus::parse("In Progress").is_pending());
    }

    #[test]
    fn test_other_statuses_are_terminal() {
        for raw in ["done", "success", "failed", "", "queued"] {
            let status = JobStatus::parse(raw);
            assert!(!status.is_pending(), "{raw} should be terminal");
            assert_eq!(status.as_str(), raw);
        }
    }

    #[test]
    fn test_missing_status() {
        assert_eq!(JobStatus::from_wire(None), None);
    }

    #[test]
    fn test_serde_roundtrip_keeps_unknown_value() {
        let status: JobStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(status, JobStatus::Other("complete".to_string()));
        assert_eq!(serde_json::to_string(&JobStatus::InProgress).unwrap(), "\"in_progress\"");
    }
}
