use core::future::Future;
use core::time::Duration;
use std::time::Instant;

use orbs_proxy_types::RetryConfig;
use tracing::{debug, warn};

use crate::error::{Upstream, UpstreamError};

/// Runs `call` with a per-attempt timeout, retrying transient failures with
/// exponential backoff until `retry.max_elapsed_time` would be exceeded.
///
/// Reverts and malformed responses are returned immediately.
pub async fn with_retry<T, F, Fut>(
    upstream: Upstream,
    method: &str,
    timeout: Duration,
    retry: &RetryConfig,
    mut call: F,
) -> Result<T, UpstreamError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let start = Instant::now();
    let mut delay = retry.initial_delay;
    let mut attempt = 1u32;

    loop {
        let result = match tokio::time::timeout(timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout { upstream, timeout }),
        };

        match result {
            Ok(value) => {
                if attempt > 1 {
                    debug!(%upstream, method, attempt, "call succeeded after retry");
                }
                return Ok(value);
            }
            Err(error)
                if error.is_transient() && start.elapsed() + delay < retry.max_elapsed_time =>
            {
                warn!(%upstream, method, attempt, %error, "⚠️  transient failure, retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                delay = retry.next_delay(delay);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
