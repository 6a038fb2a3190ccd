//! Generic long-running job.
//!
//! A [`Job`] wraps one server-side operation. Its [`JobKind`] decides how the
//! operation is started and how a successful payload becomes the value handed
//! to the success callback; everything in between (backoff polling, envelope
//! handling, key normalization, error classification, callback dispatch)
//! lives here.
//!
//! Outcomes are only ever delivered through the callbacks registered with
//! [`Job::on_success`] / [`Job::on_error`]. Register them before calling
//! [`Job::start`]: an outcome with no matching callback is logged and dropped.

mod backoff;
mod callbacks;
mod poller;


pub use backoff::Backoff;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};
use vdb_models::JobId;

use crate::config::PollConfig;
use crate::error::{VdbError, VdbResult};
use crate::logging::JobLogger;
use crate::normalize::normalize_keys;
use crate::transport::Transport;
use callbacks::Callbacks;

/// How a kind's `start` left the job.
#[derive(Debug, Clone, PartialEq)]
pub enum Started {
    /// The operation was accepted; poll this endpoint until it finishes.
    Poll(String),
    /// The final payload came back with the initial response.
    Finished(Value),
    /// Completion is driven later through the [`JobContext`] (e.g. by a
    /// nested job's callbacks).
    Delegated,
}

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Created, not started
    Idle,
    /// Initial request in flight or poll cycle running
    Started,
    /// Success callback fired (or the result was dropped)
    Completed,
    /// Error callback fired (or the error was dropped)
    Failed,
    /// Cancelled or discarded before reaching an outcome
    Cancelled,
}

impl JobState {
    /// Get the state name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Idle => "idle",
            JobState::Started => "started",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        }
    }

    /// Whether the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The per-variant part of a job.
#[async_trait]
pub trait JobKind: Send + Sync + Sized + 'static {
    /// Shape of a successful payload after key normalization.
    type Payload: DeserializeOwned + Send;
    /// Value delivered to the success callback.
    type Output: Send + 'static;

    /// Human-readable title used in logs.
    fn title(&self) -> String;

    /// Issue the request that gets the operation going.
    async fn start(&self, ctx: &JobContext<Self>) -> VdbResult<Started>;

    /// Turn the normalized payload into the delivered value.
    fn before_success(
        &self,
        payload: Self::Payload,
        ctx: &JobContext<Self>,
    ) -> VdbResult<Self::Output>;
}

struct JobInner<K: JobKind> {
    id: JobId,
    kind: K,
    transport: Arc<dyn Transport>,
    poll: PollConfig,
    logger: JobLogger,
    state: Mutex<JobState>,
    callbacks: Mutex<Callbacks<K::Output>>,
    cancel: CancellationToken,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Shared view of a job used by its background task and by its kind.
pub struct JobContext<K: JobKind> {
    inner: Arc<JobInner<K>>,
}

impl<K: JobKind> Clone for JobContext<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: JobKind> JobContext<K> {
    fn new(
        kind: K,
        transport: Arc<dyn Transport>,
        poll: PollConfig,
        cancel: CancellationToken,
    ) -> Self {
        let id = JobId::new();
        let logger = JobLogger::new(&id, kind.title());
        Self {
            inner: Arc::new(JobInner {
                id,
                kind,
                transport,
                poll,
                logger,
                state: Mutex::new(JobState::Idle),
                callbacks: Mutex::new(Callbacks::default()),
                cancel,
            }),
        }
    }

    /// Get the job ID.
    pub fn id(&self) -> &JobId {
        &self.inner.id
    }

    /// Get the job variant.
    pub fn kind(&self) -> &K {
        &self.inner.kind
    }

    /// Get the shared transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// Get the backoff settings.
    pub fn poll_config(&self) -> &PollConfig {
        &self.inner.poll
    }

    /// Get the job logger.
    pub fn logger(&self) -> &JobLogger {
        &self.inner.logger
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> JobState {
        *lock(&self.inner.state)
    }

    /// Normalize, finalize and deliver a successful payload.
    ///
    /// A payload that does not decode, or a finalization error, goes to the
    /// error callback instead.
    pub fn succeed(&self, payload: Value) {
        match self.finalize(payload) {
            Ok(output) => self.complete(output),
            Err(e) => self.fail(e),
        }
    }

    fn finalize(&self, payload: Value) -> VdbResult<K::Output> {
        let payload: K::Payload = serde_json::from_value(normalize_keys(payload))?;
        self.inner.kind.before_success(payload, self)
    }

    /// Deliver an already finalized value.
    pub fn complete(&self, output: K::Output) {
        if !self.finish(JobState::Completed) {
            debug!(job_id = %self.inner.id, state = %self.state(), "Ignoring completion");
            return;
        }
        let callback = lock(&self.inner.callbacks).take_success();
        match callback {
            Some(on_success) => {
                self.inner.logger.log_completion();
                on_success(output);
            }
            None => self
                .inner
                .logger
                .log_warning("completed with no success callback registered, result dropped"),
        }
    }

    /// Single error chokepoint: classify and deliver a failure.
    pub fn fail(&self, err: VdbError) {
        let err = err.classify();
        if !self.finish(JobState::Failed) {
            debug!(job_id = %self.inner.id, state = %self.state(), error = %err, "Ignoring failure");
            return;
        }
        self.inner.logger.log_error(&err.to_string());
        let callback = lock(&self.inner.callbacks).take_error();
        match callback {
            Some(on_error) => on_error(err),
            None => self
                .inner
                .logger
                .log_warning("failed with no error callback registered, error dropped"),
        }
    }

    fn finish(&self, to: JobState) -> bool {
        let mut state = lock(&self.inner.state);
        if *state != JobState::Started {
            return false;
        }
        *state = to;
        true
    }

    fn mark_cancelled(&self) {
        let previous = {
            let mut state = lock(&self.inner.state);
            if state.is_terminal() {
                return;
            }
            std::mem::replace(&mut *state, JobState::Cancelled)
        };
        lock(&self.inner.callbacks).clear();
        if previous == JobState::Started {
            info!(job_id = %self.inner.id, job = %self.inner.logger.title(), "Job cancelled");
        }
    }

    /// Whether the job's cancellation token fired.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Run `fut` in the background until it finishes or the job is cancelled.
    pub fn spawn_guarded<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                self.fail(VdbError::Config(format!("no tokio runtime to drive the job: {e}")));
                return;
            }
        };

        let ctx = self.clone();
        let span = self.inner.logger.create_span();
        handle.spawn(
            async move {
                tokio::select! {
                    biased;
                    _ = ctx.inner.cancel.cancelled() => ctx.mark_cancelled(),
                    _ = fut => {}
                }
            }
            .instrument(span),
        );
    }

    /// Create a job sharing this job's transport and backoff that is
    /// cancelled whenever this one is.
    pub fn child<C: JobKind>(&self, kind: C) -> Job<C> {
        Job::from_context(JobContext::new(
            kind,
            Arc::clone(&self.inner.transport),
            self.inner.poll,
            self.inner.cancel.child_token(),
        ))
    }

    async fn run(self) {
        match self.inner.kind.start(&self).await {
            Ok(Started::Poll(callback_url)) => poller::poll(&self, &callback_url).await,
            Ok(Started::Finished(payload)) => self.succeed(payload),
            Ok(Started::Delegated) => debug!(job_id = %self.inner.id, "Job delegated"),
            Err(e) => self.fail(e),
        }
    }
}

/// Handle to one long-running operation.
///
/// Dropping the handle cancels the job: pending timers and requests stop and
/// the registered callbacks are discarded without firing.
pub struct Job<K: JobKind> {
    ctx: JobContext<K>,
}

impl<K: JobKind> Job<K> {
    /// Create an idle job. Nothing runs until [`Job::start`].
    pub fn new(kind: K, transport: Arc<dyn Transport>, poll: PollConfig) -> Self {
        Self::from_context(JobContext::new(
            kind,
            transport,
            poll,
            CancellationToken::new(),
        ))
    }

    fn from_context(ctx: JobContext<K>) -> Self {
        Self { ctx }
    }

    /// Get the job ID.
    pub fn id(&self) -> &JobId {
        self.ctx.id()
    }

    /// Get the human-readable title.
    pub fn title(&self) -> &str {
        self.ctx.logger().title()
    }

    /// Get the job variant.
    pub fn kind(&self) -> &K {
        self.ctx.kind()
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> JobState {
        self.ctx.state()
    }

    /// Register the success handler, replacing any previous one.
    pub fn on_success<F>(&self, f: F) -> &Self
    where
        F: FnOnce(K::Output) + Send + 'static,
    {
        lock(&self.ctx.inner.callbacks).set_success(Box::new(f));
        self
    }

    /// Register the error handler, replacing any previous one.
    pub fn on_error<F>(&self, f: F) -> &Self
    where
        F: FnOnce(VdbError) + Send + 'static,
    {
        lock(&self.ctx.inner.callbacks).set_error(Box::new(f));
        self
    }

    /// Start the operation in the background. Returns immediately.
    ///
    /// Must be called from within a tokio runtime. Starting a job that is
    /// not idle does nothing.
    pub fn start(&self) {
        {
            let mut state = lock(&self.ctx.inner.state);
            if *state != JobState::Idle {
                self.ctx
                    .logger()
                    .log_warning(&format!("start ignored, job is {}", *state));
                return;
            }
            *state = JobState::Started;
        }
        if lock(&self.ctx.inner.callbacks).is_empty() {
            self.ctx
                .logger()
                .log_warning("started with no callbacks registered, the outcome will only be logged");
        }
        self.ctx.logger().log_start();
        self.ctx.spawn_guarded(self.ctx.clone().run());
    }

    /// Stop the job. Callbacks that have not fired never will.
    pub fn cancel(&self) {
        self.ctx.inner.cancel.cancel();
        self.ctx.mark_cancelled();
    }
}

impl<K: JobKind> Drop for Job<K> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<K: JobKind> fmt::Debug for Job<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", self.id())
            .field("title", &self.title())
            .field("state", &self.state())
            .finish()
    }
}
