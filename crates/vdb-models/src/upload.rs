//! Upload request payload.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ModelError, ModelResult};
use crate::media::MediaType;

/// Body of an upload submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadPayload {
    /// Source URL the server downloads the media from
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    /// Webhook the server notifies in addition to the poll endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl UploadPayload {
    /// Create a payload for an `http(s)` source URL.
    pub fn new(url: impl Into<String>) -> ModelResult<Self> {
        let url = url.into();
        validate_http_url(&url)?;
        Ok(Self {
            url,
            name: None,
            description: None,
            media_type: None,
            callback_url: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Set the webhook URL.
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> ModelResult<Self> {
        let callback_url = callback_url.into();
        validate_http_url(&callback_url)?;
        self.callback_url = Some(callback_url);
        Ok(self)
    }
}

fn validate_http_url(raw: &str) -> ModelResult<()> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ModelError::invalid_url(format!("{raw}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ModelError::invalid_url(format!(
            "{raw}: unsupported scheme {scheme}"
        ))),
    }
}
