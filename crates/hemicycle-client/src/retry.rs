//! Bounded exponential backoff for critical fetches.
//!
//! Only the landing-page overview goes through here. Per-section fetches
//! fail fast so one slow endpoint does not stall a whole page.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total invocations, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Wait after failed attempt number `attempt` (0-based): `base · 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` invocations have failed.
///
/// Exhaustion surfaces as [`ClientError::RetryExhausted`] wrapping the last
/// failure. Errors that are not retryable are returned as-is.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(attempts = attempt + 1, "request succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts {
                    warn!(attempts = attempt, error = %e, "retries exhausted");
                    return Err(ClientError::RetryExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                let delay = policy.delay_for(attempt - 1);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn down() -> ClientError {
        ClientError::Transport("connection refused".into())
    }

    #[test]
    fn delays_double() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_for(0), Duration::from_millis(1000));
        assert_eq!(p.delay_for(1), Duration::from_millis(2000));
        assert_eq!(p.delay_for(2), Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_is_called_max_attempts_times() {
        let mut calls: Vec<Instant> = Vec::new();
        let result = with_retry(RetryPolicy::default(), || {
            calls.push(Instant::now());
            async { Err::<(), _>(down()) }
        })
        .await;

        assert_eq!(calls.len(), 3);
        let first_gap = calls[1] - calls[0];
        let second_gap = calls[2] - calls[1];
        assert!(
            first_gap >= Duration::from_millis(1000) && first_gap < Duration::from_millis(1100),
            "{first_gap:?}"
        );
        assert!(
            second_gap >= Duration::from_millis(2000) && second_gap < Duration::from_millis(2100),
            "{second_gap:?}"
        );

        match result {
            Err(ClientError::RetryExhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, ClientError::Transport(_)));
            }
            other => panic!("expected RetryExhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failures() {
        let mut calls = 0u32;
        let result = with_retry(RetryPolicy::default(), || {
            calls += 1;
            let n = calls;
            async move {
                if n < 3 {
                    Err(ClientError::from_response(503, "{}"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn success_first_time_does_not_wait() {
        let start = Instant::now();
        let result = with_retry(RetryPolicy::default(), || async { Ok::<_, ClientError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(Instant::now() - start, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_passes_through() {
        let mut calls = 0u32;
        let result = with_retry(RetryPolicy::default(), || {
            calls += 1;
            async { Err::<(), _>(ClientError::Config("bad url".into())) }
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_never_sleeps() {
        let start = Instant::now();
        let policy = RetryPolicy::new(1, Duration::from_secs(5));
        let result = with_retry(policy, || async { Err::<(), _>(down()) }).await;
        assert!(matches!(
            result,
            Err(ClientError::RetryExhausted { attempts: 1, .. })
        ));
        assert_eq!(Instant::now() - start, Duration::ZERO);
    }
}
