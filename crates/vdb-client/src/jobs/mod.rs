//! Concrete job kinds.
//!
//! - [`TranscriptJob`]: one request, finishes immediately or polls
//! - [`UploadJob`]: submission that always polls
//! - [`IndexJob`]: drives a nested transcript job, then requests the index

pub mod index;
pub mod transcript;
pub mod upload;

pub use index::IndexJob;
pub use transcript::TranscriptJob;
pub use upload::UploadJob;
