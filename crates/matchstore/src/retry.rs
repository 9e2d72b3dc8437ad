//! Retry with exponential backoff, timeout, and fallback.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// Retry policy for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
    /// Hard timeout applied to every individual attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            attempt_timeout: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry `attempt` (1-based): `base * 2^(attempt-1)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Run `op`, retrying retryable failures per `policy`.
///
/// Each attempt runs under its own hard timeout; an elapsed timeout is
/// classified exactly like a network failure. Non-retryable errors abort
/// immediately without consuming the remaining budget. The last-seen error
/// is returned when the budget runs out.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let result = match tokio::time::timeout(policy.attempt_timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                after: policy.attempt_timeout,
            }),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retries_used = attempt - 1;
                if !err.class().is_retryable() {
                    debug!(error = %err, "store operation failed with non-retryable error");
                    return Err(err);
                }
                if retries_used >= policy.max_retries {
                    warn!(
                        error = %err,
                        attempts = attempt,
                        "store operation exhausted retry budget"
                    );
                    return Err(err);
                }
                let delay = policy.delay_for_attempt(attempt);
                debug!(
                    error = %err,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying store operation"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Run `primary` with retries; if it exhausts its budget on a transient
/// failure, run `fallback` once under the same per-attempt timeout.
///
/// Non-retryable primary failures are returned as-is without touching the
/// fallback. When both paths fail, the last-seen (fallback) error is
/// returned. Nothing panics past this boundary.
pub async fn with_retry_and_fallback<T, F, Fut, G, GFut>(
    policy: &RetryPolicy,
    primary: F,
    fallback: G,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    G: FnOnce() -> GFut,
    GFut: Future<Output = Result<T>>,
{
    let primary_err = match with_retry(policy, primary).await {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    if !primary_err.class().is_retryable() {
        return Err(primary_err);
    }

    warn!(error = %primary_err, "primary transport exhausted; invoking fallback");
    match tokio::time::timeout(policy.attempt_timeout, fallback()).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(fallback_err)) => {
            warn!(error = %fallback_err, "fallback transport also failed");
            Err(fallback_err)
        }
        Err(_) => Err(StoreError::Timeout {
            after: policy.attempt_timeout,
        }),
    }
}
