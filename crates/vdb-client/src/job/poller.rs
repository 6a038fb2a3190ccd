//! Backoff poller.

use tracing::debug;
use vdb_models::{Envelope, Unwrapped};

use super::{Backoff, JobContext, JobKind};
use crate::error::VdbError;

/// Poll `callback_url` until the operation leaves the pending state.
///
/// Polls are strictly sequential: the next request is only issued after
/// the previous one resolved and the wait elapsed. Every outcome, including
/// transport errors, goes through the context's callbacks.
pub(super) async fn poll<K: JobKind>(ctx: &JobContext<K>, callback_url: &str) {
    let mut backoff = Backoff::new(ctx.poll_config());

    loop {
        let response = match ctx.transport().get(&[callback_url]).await {
            Ok(response) => response,
            Err(e) => return ctx.fail(e),
        };

        if response.is_pending() {
            let status = response
                .status
                .as_ref()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default();
            ctx.logger()
                .log_pending(&status, backoff.current(), backoff.ceiling());

            match backoff.next_wait() {
                Some(wait) => {
                    tokio::time::sleep(wait).await;
                    continue;
                }
                None => return ctx.fail(VdbError::timed_out()),
            }
        }

        debug!(job_id = %ctx.id(), "Job reached a terminal status");
        return match Envelope::unwrap_payload(response.data) {
            Unwrapped::Failure(message) => ctx.fail(VdbError::Service(message)),
            Unwrapped::Data(data) => ctx.succeed(data),
        };
    }
}
