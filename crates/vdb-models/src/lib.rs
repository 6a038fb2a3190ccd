//! Wire and domain models for the VDB job client.
//!
//! This crate provides Serde-serializable types for:
//! - Job status vocabulary and identifiers
//! - Terminal payload envelopes and accepted-operation responses
//! - Transcripts, media metadata and index results
//! - Upload payloads

pub mod envelope;
pub mod error;
pub mod ids;
pub mod index;
pub mod media;
pub mod status;
pub mod transcript;
pub mod upload;

// Re-export common types
pub use envelope::{Accepted, Envelope, Unwrapped};
pub use error::{ModelError, ModelResult};
pub use ids::{CollectionId, JobId, VideoId};
pub use index::{IndexOutcome, IndexResponse, IndexType};
pub use media::{is_audio, MediaMeta, MediaType};
pub use status::JobStatus;
pub use transcript::{Transcript, WordTimestamp};
pub use upload::UploadPayload;
