//! Index creation, composed on top of a transcript job.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use vdb_models::{IndexOutcome, IndexResponse, IndexType, VideoId};

use crate::error::VdbResult;
use crate::job::{Job, JobContext, JobKind, JobState, Started};
use crate::jobs::TranscriptJob;

/// Build an index for a video.
///
/// Indexing needs a transcript, so `start` drives a nested
/// [`TranscriptJob`] (without forcing regeneration) and only sends the index
/// request once that job succeeds. A transcript failure becomes this job's
/// failure unchanged. The nested job is cancelled with this one.
pub struct IndexJob {
    video_id: VideoId,
    index_type: IndexType,
    transcript: Mutex<Option<Job<TranscriptJob>>>,
}

impl IndexJob {
    /// Create an index job for a video.
    pub fn new(video_id: impl Into<VideoId>, index_type: IndexType) -> Self {
        Self {
            video_id: video_id.into(),
            index_type,
            transcript: Mutex::new(None),
        }
    }

    /// Get the video ID.
    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    /// Get the requested index type.
    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// State of the nested transcript job, once started.
    pub fn transcript_state(&self) -> Option<JobState> {
        self.nested().as_ref().map(Job::state)
    }

    fn nested(&self) -> MutexGuard<'_, Option<Job<TranscriptJob>>> {
        self.transcript
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn request_index(&self, ctx: &JobContext<Self>) -> VdbResult<Value> {
        let body = json!({ "index_type": self.index_type });
        let response = ctx
            .transport()
            .post(&["video", self.video_id.as_str(), "index"], body)
            .await?;
        Ok(response.data)
    }
}

#[async_trait]
impl JobKind for IndexJob {
    type Payload = IndexResponse;
    type Output = IndexOutcome;

    fn title(&self) -> String {
        format!("{} index for video {}", self.index_type, self.video_id)
    }

    async fn start(&self, ctx: &JobContext<Self>) -> VdbResult<Started> {
        let transcript = ctx.child(TranscriptJob::new(self.video_id.clone(), false));

        let on_transcript = ctx.clone();
        let on_failure = ctx.clone();
        transcript
            .on_success(move |transcript| {
                debug!(
                    job_id = %on_transcript.id(),
                    words = transcript.word_timestamps.len(),
                    "Transcript ready, requesting index"
                );
                let ctx = on_transcript.clone();
                on_transcript.spawn_guarded(async move {
                    match ctx.kind().request_index(&ctx).await {
                        Ok(data) => ctx.succeed(data),
                        Err(e) => ctx.fail(e),
                    }
                });
            })
            .on_error(move |err| on_failure.fail(err));

        transcript.start();
        *self.nested() = Some(transcript);
        Ok(Started::Delegated)
    }

    fn before_success(&self, payload: IndexResponse, _ctx: &JobContext<Self>) -> VdbResult<IndexOutcome> {
        Ok(IndexOutcome::from(payload))
    }
}
