//! Transcript models.

use serde::{Deserialize, Serialize};

/// A single timed word of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Spoken word (may include punctuation)
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Transcript generated for a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full transcript text, when the server provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Word-level timing
    #[serde(default)]
    pub word_timestamps: Vec<WordTimestamp>,
}

impl Transcript {
    /// Transcript text, rebuilt from the timed words if the server sent none.
    pub fn full_text(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self
                .word_timestamps
                .iter()
                .map(|w| w.word.trim())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Duration covered by the timed words, in seconds.
    pub fn duration(&self) -> f64 {
        self.word_timestamps.last().map(|w| w.end).unwrap_or(0.0)
    }
}
