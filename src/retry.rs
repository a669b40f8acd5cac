use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, error, warn};

use crate::error::{HecError, HecResult};
use crate::response::Response;

pub(crate) const DEFAULT_MAX_RETRIES: usize = 2;
pub(crate) const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Sends one request body, retrying on transient collector failures.
///
/// `build` produces a fresh request for each attempt. Connection-level
/// failures are surfaced immediately and never retried here; only a
/// completed exchange whose code classifies as retriable is attempted
/// again, after a fixed wait, up to `max_retries` additional attempts.
pub(crate) async fn send_with_retry<F>(
    max_retries: usize,
    interval: Duration,
    build: F,
) -> HecResult<()>
where
    F: Fn() -> RequestBuilder,
{
    for attempt in 0..=max_retries {
        let response = build().send().await?;
        if response.status() == StatusCode::OK {
            debug!("request accepted on attempt {}", attempt + 1);
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await?;
        let result = Response::from_body(&body);
        if result.is_retriable() && attempt < max_retries {
            warn!(
                "attempt {} failed with status {} code {} (retrying): {}",
                attempt + 1,
                status,
                result.code,
                result.text
            );
            tokio::time::sleep(interval).await;
            continue;
        }
        error!(
            "attempt {} failed with status {} code {}: {}",
            attempt + 1,
            status,
            result.code,
            result.text
        );
        return Err(HecError::Server(result));
    }
    unreachable!("retry loop always returns")
}
