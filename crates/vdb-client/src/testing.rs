//! Scripted in-memory transport for job tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::Instant;

use crate::config::PollConfig;
use crate::error::{VdbError, VdbResult};
use crate::job::{Job, JobKind};
use crate::transport::{ApiResponse, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub at: Instant,
}

/// Answers each `(method, path)` from a queue of scripted responses and
/// records every call.
#[derive(Default)]
pub(crate) struct MockTransport {
    scripts: Mutex<HashMap<(Method, String), VecDeque<VdbResult<ApiResponse>>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_get(&self, path: &str, response: VdbResult<ApiResponse>) -> &Self {
        self.push(Method::Get, path, response)
    }

    pub fn on_post(&self, path: &str, response: VdbResult<ApiResponse>) -> &Self {
        self.push(Method::Post, path, response)
    }

    /// Script `n` pending answers for a callback endpoint.
    pub fn pending_gets(&self, path: &str, n: usize) -> &Self {
        for _ in 0..n {
            self.on_get(path, Ok(ApiResponse::in_progress()));
        }
        self
    }

    fn push(&self, method: Method, path: &str, response: VdbResult<ApiResponse>) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn answer(&self, method: Method, path: &[&str], body: Option<Value>) -> VdbResult<ApiResponse> {
        let path = path.join("/");
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.clone(),
            body,
            at: Instant::now(),
        });
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&(method, path.clone()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(VdbError::invalid_response(format!(
                    "unscripted {method:?} {path}"
                )))
            })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &[&str]) -> VdbResult<ApiResponse> {
        self.answer(Method::Get, path, None)
    }

    async fn post(&self, path: &[&str], body: Value) -> VdbResult<ApiResponse> {
        self.answer(Method::Post, path, Some(body))
    }
}

/// 1s initial wait, doubling, 8s ceiling.
pub(crate) fn test_poll() -> PollConfig {
    PollConfig::new(Duration::from_secs(1), 2, Duration::from_secs(8))
}

/// Register both callbacks of `job` to report into a channel.
pub(crate) fn capture<K: JobKind>(job: &Job<K>) -> oneshot::Receiver<Result<K::Output, VdbError>> {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let on_error = Arc::clone(&tx);
    job.on_success(move |output| {
        if let Some(tx) = tx.lock().unwrap().take() {
            let _ = tx.send(Ok(output));
        }
    })
    .on_error(move |err| {
        if let Some(tx) = on_error.lock().unwrap().take() {
            let _ = tx.send(Err(err));
        }
    });
    rx
}
