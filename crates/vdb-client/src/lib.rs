//! Async job client for long-running media operations.
//!
//! This crate provides:
//! - A `Transport` seam with a reqwest-backed HTTP implementation
//! - A generic `Job` with exponential-backoff polling and callback delivery
//! - Transcript, upload and index job kinds (index composes a transcript job)
//! - Key normalization of wire payloads
//! - A `VdbClient` facade and `Video`/`Audio` media objects

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod job;
pub mod jobs;
pub mod logging;
pub mod media;
pub mod normalize;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::VdbClient;
pub use config::{ClientConfig, PollConfig};
pub use error::{VdbError, VdbResult};
pub use http::HttpTransport;
pub use job::{Backoff, Job, JobContext, JobKind, JobState, Started};
pub use jobs::{IndexJob, TranscriptJob, UploadJob};
pub use logging::JobLogger;
pub use media::{Audio, Media, Video};
pub use normalize::normalize_keys;
pub use transport::{ApiResponse, Transport};
