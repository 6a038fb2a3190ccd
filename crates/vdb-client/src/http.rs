//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{VdbError, VdbResult};
use crate::transport::{join_path, ApiResponse, Transport};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-access-token";

/// HTTP transport for the remote API.
pub struct HttpTransport {
    http: Client,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a new transport.
    pub fn new(config: ClientConfig) -> VdbResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VdbError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VdbResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for a path. Identifier segments are percent-encoded.
    pub fn url(&self, path: &[&str]) -> String {
        let encoded: Vec<String> = path
            .iter()
            .map(|segment| {
                if segment.contains("://") || segment.starts_with('?') || segment.starts_with('&') {
                    segment.to_string()
                } else {
                    urlencoding::encode(segment).into_owned()
                }
            })
            .collect();
        let segments: Vec<&str> = encoded.iter().map(String::as_str).collect();
        join_path(&self.config.base_url, &segments)
    }

    async fn send(&self, request: RequestBuilder) -> VdbResult<ApiResponse> {
        let request = match &self.config.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(VdbError::from_http_status(status.as_u16(), error_message(&text)));
        }

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(ApiResponse::from_body(body))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &[&str]) -> VdbResult<ApiResponse> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(self.http.get(&url)).await
    }

    async fn post(&self, path: &[&str], body: Value) -> VdbResult<ApiResponse> {
        let url = self.url(path);
        debug!("POST {}", url);
        self.send(self.http.post(&url).json(&body)).await
    }
}

/// Prefer the `message` field of a JSON error body over the raw text.
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(ClientConfig {
            base_url: server.uri(),
            ..ClientConfig::default()
        }
        .with_api_key("secret"))
        .unwrap()
    }

    #[test]
    fn test_url_encodes_identifiers() {
        let transport = HttpTransport::new(ClientConfig::default()).unwrap();
        assert_eq!(
            transport.url(&["video", "m 1", "transcription", "?force=false"]),
            "http://localhost:8000/video/m%201/transcription?force=false"
        );
        assert_eq!(
            transport.url(&["https://cb.example.com/async/1"]),
            "https://cb.example.com/async/1"
        );
    }

    #[test]
    fn test_error_message_prefers_json_field() {
        assert_eq!(error_message(r#"{"message": "bad key"}"#), "bad key");
        assert_eq!(error_message("plain text "), "plain text");
    }

    #[tokio::test]
    async fn test_get_sends_key_and_parses_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video/m-1/transcription"))
            .and(query_param("force", "true"))
            .and(header(API_KEY_HEADER, "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "status": "processing",
                "data": {"output_url": "https://cb/1"}
            })))
            .mount(&server)
            .await;

        let res = transport(&server)
            .get(&["video", "m-1", "transcription", "?force=true"])
            .await
            .unwrap();
        assert!(res.is_pending());
        assert_eq!(res.data, json!({"output_url": "https://cb/1"}));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/video/m-1/index"))
            .and(body_json(json!({"index_type": "spoken_word"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let res = transport(&server)
            .post(&["video", "m-1", "index"], json!({"index_type": "spoken_word"}))
            .await
            .unwrap();
        assert_eq!(res.data, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_http_errors_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad key"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let transport = transport(&server);
        let err = transport.get(&["auth"]).await.unwrap_err();
        assert!(matches!(err, VdbError::Authentication(ref m) if m == "bad key"));

        let err = transport.get(&["broken"]).await.unwrap_err();
        assert!(matches!(err, VdbError::Service(ref m) if m == "oops"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = transport(&server).get(&["garbage"]).await.unwrap_err();
        assert!(matches!(err, VdbError::Json(_)));
    }
}
