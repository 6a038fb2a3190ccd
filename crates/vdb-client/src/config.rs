//! Client and polling configuration.

use std::time::Duration;

use tracing::warn;

/// Smallest multiplier that still grows the delay between polls.
pub const MIN_MULTIPLIER: u32 = 2;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API
    pub base_url: String,
    /// API key sent with every request
    pub api_key: Option<String>,
    /// Timeout of a single HTTP request
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VDB_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            api_key: std::env::var("VDB_API_KEY").ok().filter(|k| !k.is_empty()),
            timeout: Duration::from_secs(
                std::env::var("VDB_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Set the API key sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Backoff parameters shared by every job created from a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait before the second poll
    pub initial_delay: Duration,
    /// Integer factor applied to the wait after every pending poll
    pub multiplier: u32,
    /// Once the wait reaches this value the next pending poll times out
    pub max_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            multiplier: 2,
            max_delay: Duration::from_secs(500),
        }
    }
}

impl PollConfig {
    /// Create backoff settings.
    pub fn new(initial_delay: Duration, multiplier: u32, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            multiplier,
            max_delay,
        }
        .sanitized()
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_delay: std::env::var("VDB_POLL_INITIAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_delay),
            multiplier: std::env::var("VDB_POLL_MULTIPLIER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.multiplier),
            max_delay: std::env::var("VDB_POLL_MAX_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_delay),
        }
        .sanitized()
    }

    /// Clamp values so the delay strictly increases toward the ceiling.
    pub fn sanitized(mut self) -> Self {
        if self.multiplier < MIN_MULTIPLIER {
            warn!(
                multiplier = self.multiplier,
                "Poll multiplier too small, using {}", MIN_MULTIPLIER
            );
            self.multiplier = MIN_MULTIPLIER;
        }
        if self.initial_delay.is_zero() {
            warn!("Initial poll delay is zero, using 1ms");
            self.initial_delay = Duration::from_millis(1);
        }
        self
    }
}
