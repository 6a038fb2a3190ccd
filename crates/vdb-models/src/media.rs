//! Media metadata returned by completed uploads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Kind of uploaded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Video,
    Audio,
    Image,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Image => "image",
        }
    }
}

/// Metadata describing a stored media object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMeta {
    /// Server-assigned ID (`m-` prefix for videos, `a-` for audio)
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    /// Length in seconds; the server sends it as a number or a string
    #[serde(
        default,
        deserialize_with = "de_opt_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Whether a completed upload produced audio rather than video.
pub fn is_audio(meta: &MediaMeta) -> bool {
    match meta.media_type {
        Some(media_type) => media_type == MediaType::Audio,
        None => meta.id.starts_with("a-"),
    }
}

fn de_opt_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected seconds, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_length_accepts_string_or_number() {
        let a: MediaMeta = serde_json::from_value(json!({"id": "m-1", "length": "12.5"})).unwrap();
        let b: MediaMeta = serde_json::from_value(json!({"id": "m-2", "length": 3})).unwrap();
        let c: MediaMeta = serde_json::from_value(json!({"id": "m-3"})).unwrap();
        assert_eq!(a.length, Some(12.5));
        assert_eq!(b.length, Some(3.0));
        assert_eq!(c.length, None);
    }

    #[test]
    fn test_is_audio_prefers_media_type() {
        let by_prefix: MediaMeta = serde_json::from_value(json!({"id": "a-1"})).unwrap();
        let by_type: MediaMeta =
            serde_json::from_value(json!({"id": "m-1", "media_type": "audio"})).unwrap();
        let video: MediaMeta = serde_json::from_value(json!({"id": "m-2"})).unwrap();
        assert!(is_audio(&by_prefix));
        assert!(is_audio(&by_type));
        assert!(!is_audio(&video));
    }
}
