//! Media upload.

use std::sync::Arc;

use async_trait::async_trait;
use vdb_models::{Accepted, CollectionId, Envelope, MediaMeta, Unwrapped, UploadPayload};

use crate::error::{VdbError, VdbResult};
use crate::job::{JobContext, JobKind, Started};
use crate::media::Media;
use crate::normalize::normalize_keys;

/// Upload media into a collection and wait until the server has ingested it.
#[derive(Debug, Clone)]
pub struct UploadJob {
    collection_id: CollectionId,
    payload: UploadPayload,
}

impl UploadJob {
    /// Create an upload job for a collection.
    pub fn new(collection_id: impl Into<CollectionId>, payload: UploadPayload) -> Self {
        Self {
            collection_id: collection_id.into(),
            payload,
        }
    }

    /// Get the target collection ID.
    pub fn collection_id(&self) -> &CollectionId {
        &self.collection_id
    }

    /// Get the submitted payload.
    pub fn payload(&self) -> &UploadPayload {
        &self.payload
    }
}

#[async_trait]
impl JobKind for UploadJob {
    type Payload = MediaMeta;
    type Output = Media;

    fn title(&self) -> String {
        match &self.payload.name {
            Some(name) => format!("upload of {} into {}", name, self.collection_id),
            None => format!("upload of {} into {}", self.payload.url, self.collection_id),
        }
    }

    async fn start(&self, ctx: &JobContext<Self>) -> VdbResult<Started> {
        let body = serde_json::to_value(&self.payload)?;
        let response = ctx
            .transport()
            .post(&["collection", self.collection_id.as_str(), "upload"], body)
            .await?;

        let data = match Envelope::unwrap_payload(normalize_keys(response.data)) {
            Unwrapped::Failure(message) => return Err(VdbError::Service(message)),
            Unwrapped::Data(data) => data,
        };
        match Accepted::from_payload(&data) {
            Some(accepted) => Ok(Started::Poll(accepted.output_url)),
            None => Err(VdbError::invalid_response(
                "upload response without output_url",
            )),
        }
    }

    fn before_success(&self, payload: MediaMeta, ctx: &JobContext<Self>) -> VdbResult<Media> {
        Ok(Media::from_meta(
            payload,
            Arc::clone(ctx.transport()),
            *ctx.poll_config(),
        ))
    }
}
