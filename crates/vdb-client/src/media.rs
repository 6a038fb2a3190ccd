//! Media objects built from completed uploads.

use std::fmt;
use std::sync::Arc;

use vdb_models::{is_audio, IndexType, MediaMeta, VideoId};

use crate::config::PollConfig;
use crate::error::VdbResult;
use crate::job::Job;
use crate::jobs::{IndexJob, TranscriptJob};
use crate::normalize::normalize_keys;
use crate::transport::Transport;

/// A stored video that can start follow-up jobs.
pub struct Video {
    meta: MediaMeta,
    transport: Arc<dyn Transport>,
    poll: PollConfig,
}

impl Video {
    /// Wrap metadata of a stored video.
    pub fn new(meta: MediaMeta, transport: Arc<dyn Transport>, poll: PollConfig) -> Self {
        Self {
            meta,
            transport,
            poll,
        }
    }

    /// Get the video ID.
    pub fn id(&self) -> VideoId {
        VideoId::from(self.meta.id.as_str())
    }

    /// Get the last fetched metadata.
    pub fn meta(&self) -> &MediaMeta {
        &self.meta
    }

    /// Transcript job for this video (not started).
    pub fn generate_transcript(&self, force: bool) -> Job<TranscriptJob> {
        Job::new(
            TranscriptJob::new(self.id(), force),
            Arc::clone(&self.transport),
            self.poll,
        )
    }

    /// Index job for this video (not started).
    pub fn index(&self, index_type: IndexType) -> Job<IndexJob> {
        Job::new(
            IndexJob::new(self.id(), index_type),
            Arc::clone(&self.transport),
            self.poll,
        )
    }

    /// Re-fetch the metadata from the server.
    pub async fn refresh(&mut self) -> VdbResult<&MediaMeta> {
        let id = self.meta.id.clone();
        self.meta = fetch_meta(&*self.transport, "video", &id).await?;
        Ok(&self.meta)
    }
}

impl fmt::Debug for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Video")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// A stored audio file.
pub struct Audio {
    meta: MediaMeta,
    transport: Arc<dyn Transport>,
}

impl Audio {
    /// Wrap metadata of a stored audio file.
    pub fn new(meta: MediaMeta, transport: Arc<dyn Transport>) -> Self {
        Self { meta, transport }
    }

    /// Get the audio ID.
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Get the last fetched metadata.
    pub fn meta(&self) -> &MediaMeta {
        &self.meta
    }

    /// Re-fetch the metadata from the server.
    pub async fn refresh(&mut self) -> VdbResult<&MediaMeta> {
        let id = self.meta.id.clone();
        self.meta = fetch_meta(&*self.transport, "audio", &id).await?;
        Ok(&self.meta)
    }
}

impl fmt::Debug for Audio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Audio")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Result of a completed upload.
#[derive(Debug)]
pub enum Media {
    Video(Video),
    Audio(Audio),
}

impl Media {
    /// Build the right media object for the metadata.
    pub fn from_meta(meta: MediaMeta, transport: Arc<dyn Transport>, poll: PollConfig) -> Self {
        if is_audio(&meta) {
            Media::Audio(Audio::new(meta, transport))
        } else {
            Media::Video(Video::new(meta, transport, poll))
        }
    }

    /// Get the metadata of either variant.
    pub fn meta(&self) -> &MediaMeta {
        match self {
            Media::Video(video) => video.meta(),
            Media::Audio(audio) => audio.meta(),
        }
    }

    /// Whether the upload produced an audio file.
    pub fn is_audio(&self) -> bool {
        matches!(self, Media::Audio(_))
    }

    /// Get the video, if the upload produced one.
    pub fn into_video(self) -> Option<Video> {
        match self {
            Media::Video(video) => Some(video),
            Media::Audio(_) => None,
        }
    }
}

async fn fetch_meta(transport: &dyn Transport, kind: &str, id: &str) -> VdbResult<MediaMeta> {
    let response = transport.get(&[kind, id]).await?;
    Ok(serde_json::from_value(normalize_keys(response.data))?)
}
