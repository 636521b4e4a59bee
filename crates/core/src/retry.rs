//! Bounded retry with exponential backoff for throttling-class errors.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::AppResult;

/// Retry settings for remote calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    #[serde(rename = "maxAttempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds
    #[serde(rename = "baseDelayMs")]
    pub base_delay_ms: u64,

    /// Upper bound for a single delay, in milliseconds
    #[serde(rename = "maxDelayMs")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5_000,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        let millis = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(millis)
    }

    /// Run `operation`, retrying while it fails with a retryable error.
    ///
    /// Permanent errors are returned immediately. The last error is returned
    /// once `max_attempts` is exhausted.
    pub async fn run<T, F, Fut>(&self, operation_name: &str, mut operation: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} throttled (attempt {}/{}), retrying in {:?}: {}",
                        operation_name,
                        attempt,
                        max_attempts,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 100,
            max_delay_ms: 350,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(350));
        assert_eq!(policy.delay_for(10), Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_retries_throttled_until_success() {
        let calls = AtomicU32::new(0);
        let result = instant_policy(3)
            .run("test", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(AppError::Throttled("429".to_string()))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = instant_policy(5)
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::Llm("invalid model identifier".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: AppResult<()> = instant_policy(2)
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AppError::Throttled("still busy".to_string()))
            })
            .await;

        assert!(matches!(result, Err(AppError::Throttled(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_runs_once() {
        let calls = AtomicU32::new(0);
        let _ = instant_policy(1)
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AppError::Throttled("busy".to_string()))
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
