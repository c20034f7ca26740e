use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{AppError, AppResult};

/// Retry behavior for upstream calls.
///
/// Only errors accepted by `retryable` are retried. Everything else is
/// returned to the caller on the first failure.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each subsequent one
    pub base_delay: Duration,
    /// Upper bound on a single delay
    pub max_delay: Duration,
    pub retryable: fn(&AppError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            retryable: AppError::is_transient,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// min(base_delay * 2^attempt, max_delay)
    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
            .min(self.max_delay)
    }

    /// Runs `f`, retrying while the error is retryable and attempts remain.
    pub async fn execute<F, Fut, T>(&self, operation: &str, mut f: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 0;

        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(operation, retries = attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.max_retries && (self.retryable)(&err) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        operation,
                        error = %err,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Transient upstream failure, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(1500),
            ..RetryPolicy::default()
        };

        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(30), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_single_retry_recovers_transient_failure() {
        let policy = fast_policy(1);
        let calls = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute("test", || {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(AppError::Timeout)
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let policy = fast_policy(1);
        let calls = Arc::new(AtomicU32::new(0));

        let result: AppResult<()> = policy
            .execute("test", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::Timeout)
                }
            })
            .await;

        assert!(matches!(result, Err(AppError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_upstream_errors_are_not_retried() {
        let policy = fast_policy(3);
        let calls = Arc::new(AtomicU32::new(0));

        let result: AppResult<()> = policy
            .execute("test", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::Upstream {
                        status: StatusCode::NOT_FOUND,
                        message: "not found".to_string(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_predicate() {
        let policy = RetryPolicy {
            retryable: |err| matches!(err, AppError::Internal(_)),
            ..fast_policy(2)
        };
        let calls = Arc::new(AtomicU32::new(0));

        let result: AppResult<()> = policy
            .execute("test", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::Internal("flaky".to_string()))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_none_never_retries() {
        let policy = RetryPolicy::none();
        let calls = Arc::new(AtomicU32::new(0));

        let _: AppResult<()> = policy
            .execute("test", || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::Timeout)
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
