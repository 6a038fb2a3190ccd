//! Transcript generation.

use async_trait::async_trait;
use vdb_models::{Accepted, Envelope, Transcript, Unwrapped, VideoId};

use crate::error::{VdbError, VdbResult};
use crate::job::{JobContext, JobKind, Started};
use crate::normalize::normalize_keys;

/// Fetch (or generate) the transcript of a video.
///
/// When the transcript already exists the first response carries it and the
/// job completes without polling.
#[derive(Debug, Clone)]
pub struct TranscriptJob {
    video_id: VideoId,
    force: bool,
}

impl TranscriptJob {
    /// `force` regenerates the transcript even if one exists.
    pub fn new(video_id: impl Into<VideoId>, force: bool) -> Self {
        Self {
            video_id: video_id.into(),
            force,
        }
    }

    /// Get the video ID.
    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    /// Whether regeneration is forced.
    pub fn force(&self) -> bool {
        self.force
    }
}

#[async_trait]
impl JobKind for TranscriptJob {
    type Payload = Transcript;
    type Output = Transcript;

    fn title(&self) -> String {
        format!("transcript for video {}", self.video_id)
    }

    async fn start(&self, ctx: &JobContext<Self>) -> VdbResult<Started> {
        let query = format!("?force={}", self.force);
        let response = ctx
            .transport()
            .get(&["video", self.video_id.as_str(), "transcription", &query])
            .await?;

        let pending = response.is_pending();
        let data = match Envelope::unwrap_payload(normalize_keys(response.data)) {
            Unwrapped::Failure(message) => return Err(VdbError::Service(message)),
            Unwrapped::Data(data) => data,
        };
        if let Some(accepted) = Accepted::from_payload(&data) {
            return Ok(Started::Poll(accepted.output_url));
        }
        if pending {
            return Err(VdbError::invalid_response(
                "pending transcript response without output_url",
            ));
        }
        Ok(Started::Finished(data))
    }

    fn before_success(&self, payload: Transcript, _ctx: &JobContext<Self>) -> VdbResult<Transcript> {
        Ok(payload)
    }
}
