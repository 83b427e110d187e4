//! Retry with exponential backoff for transient feed errors.
//!
//! Only HTTP 429 and network-level failures are retried. A 404, any other
//! non-2xx status, or a body that does not parse fails immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

fn is_retriable(err: &CatalogError) -> bool {
    matches!(err, CatalogError::RateLimited { .. } | CatalogError::Http(_))
}

/// Seconds to wait before retry number `attempt + 1`.
///
/// `backoff_base_secs * 2^attempt`, raised to the server's `Retry-After`
/// when a 429 asked for longer.
fn delay_for(err: &CatalogError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        CatalogError::RateLimited {
            retry_after_secs, ..
        } => backoff.max(*retry_after_secs),
        _ => backoff,
    }
}

/// Runs `operation`, retrying retriable errors up to `max_retries` extra times.
///
/// With `max_retries = 3` the operation runs at most 4 times; the last error
/// is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, CatalogError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay_secs = delay_for(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient feed error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
