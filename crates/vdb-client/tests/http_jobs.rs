//! End-to-end job tests against a mock HTTP server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::sync::oneshot;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vdb_client::{ClientConfig, Job, JobKind, JobState, PollConfig, VdbClient, VdbError};
use vdb_models::{IndexType, UploadPayload};

fn client(server: &MockServer) -> VdbClient {
    let config = ClientConfig {
        base_url: server.uri(),
        ..ClientConfig::default()
    }
    .with_api_key("test-key");
    let poll = PollConfig::new(Duration::from_millis(10), 2, Duration::from_millis(200));
    VdbClient::new(config, poll).unwrap()
}

async fn outcome<K: JobKind>(job: &Job<K>) -> Result<K::Output, VdbError> {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let on_error = Arc::clone(&tx);
    job.on_success(move |out| {
        if let Some(tx) = tx.lock().unwrap().take() {
            let _ = tx.send(Ok(out));
        }
    })
    .on_error(move |err| {
        if let Some(tx) = on_error.lock().unwrap().take() {
            let _ = tx.send(Err(err));
        }
    });
    job.start();
    tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("job did not finish")
        .expect("callbacks dropped")
}

#[tokio::test]
async fn test_transcript_polls_until_done() {
    let server = MockServer::start().await;
    let callback = format!("{}/async-response/t-1", server.uri());

    Mock::given(method("GET"))
        .and(path("/video/m-1/transcription"))
        .and(query_param("force", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "processing",
            "data": {"outputUrl": callback}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/async-response/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "in_progress"})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/async-response/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "done",
            "data": {"text": "hello there", "wordTimestamps": []}
        })))
        .mount(&server)
        .await;

    let job = client(&server).transcript("m-1", false);
    let transcript = outcome(&job).await.unwrap();

    assert_eq!(transcript.full_text(), "hello there");
    assert_eq!(job.state(), JobState::Completed);
}

#[tokio::test]
async fn test_upload_times_out() {
    let server = MockServer::start().await;
    let callback = format!("{}/async-response/u-1", server.uri());

    Mock::given(method("POST"))
        .and(path("/collection/default/upload"))
        .and(body_json(json!({"url": "https://example.com/a.mp4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "processing",
            "data": {"output_url": callback}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/async-response/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .mount(&server)
        .await;

    let payload = UploadPayload::new("https://example.com/a.mp4").unwrap();
    let job = client(&server).upload("default", payload);
    let err = outcome(&job).await.unwrap_err();

    assert!(err.is_timeout());
    // Waits of 10, 20, 40, 80 and 160ms; the 6th pending poll sees 320ms >= 200ms.
    let polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/async-response/u-1")
        .count();
    assert_eq!(polls, 6);
}

#[tokio::test]
async fn test_index_forwards_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/video/m-1/transcription"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "invalid key"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/video/m-1/index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let job = client(&server).index("m-1", IndexType::SpokenWord);
    let err = outcome(&job).await.unwrap_err();

    assert!(matches!(err, VdbError::Authentication(ref m) if m == "invalid key"));
}
