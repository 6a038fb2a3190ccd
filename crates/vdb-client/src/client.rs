//! Client facade creating jobs that share one transport.

use std::sync::Arc;

use vdb_models::{CollectionId, IndexType, UploadPayload, VideoId};

use crate::config::{ClientConfig, PollConfig};
use crate::error::VdbResult;
use crate::http::HttpTransport;
use crate::job::Job;
use crate::jobs::{IndexJob, TranscriptJob, UploadJob};
use crate::transport::Transport;

/// Entry point of the library.
///
/// Every job it creates is returned un-started: register callbacks, then
/// call [`Job::start`]. Keep the returned handle alive until an outcome is
/// delivered; dropping it cancels the job.
#[derive(Clone)]
pub struct VdbClient {
    transport: Arc<dyn Transport>,
    poll: PollConfig,
}

impl VdbClient {
    /// Create a client talking HTTP.
    pub fn new(config: ClientConfig, poll: PollConfig) -> VdbResult<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?), poll))
    }

    /// Create from environment variables.
    pub fn from_env() -> VdbResult<Self> {
        Self::new(ClientConfig::from_env(), PollConfig::from_env())
    }

    /// Create a client on top of any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, poll: PollConfig) -> Self {
        Self { transport, poll }
    }

    /// Get the shared transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Get the backoff settings handed to every job.
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Transcript job for a video (not started).
    pub fn transcript(&self, video_id: impl Into<VideoId>, force: bool) -> Job<TranscriptJob> {
        self.job(TranscriptJob::new(video_id, force))
    }

    /// Upload job into a collection (not started).
    pub fn upload(
        &self,
        collection_id: impl Into<CollectionId>,
        payload: UploadPayload,
    ) -> Job<UploadJob> {
        self.job(UploadJob::new(collection_id, payload))
    }

    /// Index job for a video (not started).
    pub fn index(&self, video_id: impl Into<VideoId>, index_type: IndexType) -> Job<IndexJob> {
        self.job(IndexJob::new(video_id, index_type))
    }

    fn job<K: crate::job::JobKind>(&self, kind: K) -> Job<K> {
        Job::new(kind, Arc::clone(&self.transport), self.poll)
    }
}
