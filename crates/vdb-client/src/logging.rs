//! Structured job logging.
//!
//! Every line emitted on behalf of a job carries its client-side ID and its
//! human-readable title.

use std::time::Duration;

use tracing::{error, info, warn, Span};
use vdb_models::JobId;

/// Job logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    title: String,
}

impl JobLogger {
    /// Create a logger for a job.
    ///
    /// # Arguments
    /// * `job_id` - Client-side identifier of the job
    /// * `title` - Human-readable description (e.g., "transcript for m-123")
    pub fn new(job_id: &JobId, title: impl Into<String>) -> Self {
        Self {
            job_id: job_id.to_string(),
            title: title.into(),
        }
    }

    /// Log the start of the job.
    pub fn log_start(&self) {
        info!(job_id = %self.job_id, job = %self.title, "Job started");
    }

    /// Log a poll that observed a pending status.
    pub fn log_pending(&self, status: &str, delay: Duration, ceiling: Duration) {
        info!(
            job_id = %self.job_id,
            job = %self.title,
            status = %status,
            delay_ms = delay.as_millis() as u64,
            ceiling_ms = ceiling.as_millis() as u64,
            "Job pending"
        );
    }

    /// Log a warning during the job.
    pub fn log_warning(&self, message: &str) {
        warn!(job_id = %self.job_id, job = %self.title, "Job warning: {}", message);
    }

    /// Log a failure of the job.
    pub fn log_error(&self, message: &str) {
        error!(job_id = %self.job_id, job = %self.title, "Job error: {}", message);
    }

    /// Log successful completion of the job.
    pub fn log_completion(&self) {
        info!(job_id = %self.job_id, job = %self.title, "Job completed");
    }

    /// Get the job ID.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Get the job title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Span wrapping the job's background task.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("job", job_id = %self.job_id, job = %self.title)
    }
}
