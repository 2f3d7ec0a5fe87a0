//! Retry with exponential backoff
//!
//! Only transient repository failures are retried. Anything else (bad
//! configuration, unknown strategy, a record that does not exist) fails fast.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use stock_analysis::{Result, StockError};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Backoff before the first retry
    pub initial_backoff: Duration,

    /// Upper bound for any single backoff
    pub max_backoff: Duration,

    /// Growth factor between consecutive backoffs
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
            backoff_multiplier,
        }
    }

    /// Create a policy with no retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Create a policy with fast retries (for testing)
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(100),
            backoff_multiplier: 2.0,
        }
    }

    /// Backoff before retry number `attempt` (1-based), capped at `max_backoff`
    fn backoff_duration(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let backoff_ms = self.initial_backoff.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let backoff = Duration::from_millis(backoff_ms as u64);

        backoff.min(self.max_backoff)
    }

    fn is_retryable(error: &StockError) -> bool {
        error.is_transient()
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out
    ///
    /// Returns the last error when every attempt fails.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(operation = operation_name, attempt, max_attempts, "Running operation");

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(operation = operation_name, retries = attempt - 1, "Operation succeeded after retries");
                    }
                    return Ok(result);
                }
                Err(err) if !Self::is_retryable(&err) => {
                    debug!(operation = operation_name, error = %err, "Operation failed with non-retryable error");
                    return Err(err);
                }
                Err(err) if attempt >= max_attempts => {
                    warn!(operation = operation_name, attempts = attempt, error = %err, "Operation failed after all attempts");
                    return Err(err);
                }
                Err(err) => {
                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        operation = operation_name,
                        attempt,
                        max_attempts,
                        error = %err,
                        ?backoff,
                        "Operation failed, retrying"
                    );
                    sleep(backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn unavailable() -> StockError {
        StockError::Repository(stock_core::Error::Unavailable("db down".to_string()))
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_secs(1));
        assert_eq!(policy.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_backoff_calculation() {
        let policy = RetryPolicy::fast();

        assert_eq!(policy.backoff_duration(0), Duration::ZERO);
        assert_eq!(policy.backoff_duration(1), Duration::from_millis(10));
        assert_eq!(policy.backoff_duration(2), Duration::from_millis(20));
        assert_eq!(policy.backoff_duration(3), Duration::from_millis(40));
        // Capped
        assert_eq!(policy.backoff_duration(10), Duration::from_millis(100));
    }

    #[test]
    fn test_is_retryable() {
        assert!(RetryPolicy::is_retryable(&unavailable()));
        assert!(!RetryPolicy::is_retryable(&StockError::Repository(
            stock_core::Error::NotFound("AAPL".to_string())
        )));
        assert!(!RetryPolicy::is_retryable(&StockError::UnknownStrategy("x".to_string())));
    }

    #[tokio::test]
    async fn test_execute_success_after_retry() {
        let policy = RetryPolicy::fast();
        let attempt_count = Arc::new(Mutex::new(0));
        let count = attempt_count.clone();

        let result = policy
            .execute("test_op", || {
                let count = count.clone();
                async move {
                    let mut current = count.lock().await;
                    *current += 1;
                    if *current < 2 { Err(unavailable()) } else { Ok(42) }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(*attempt_count.lock().await, 2);
    }

    #[tokio::test]
    async fn test_execute_all_attempts_fail() {
        let policy = RetryPolicy::fast();
        let attempt_count = Arc::new(Mutex::new(0));
        let count = attempt_count.clone();

        let result: Result<i32> = policy
            .execute("test_op", || {
                let count = count.clone();
                async move {
                    *count.lock().await += 1;
                    Err(unavailable())
                }
            })
            .await;

        assert!(result.unwrap_err().is_transient());
        assert_eq!(*attempt_count.lock().await, 3);
    }

    #[tokio::test]
    async fn test_execute_non_retryable_error() {
        let policy = RetryPolicy::fast();
        let attempt_count = Arc::new(Mutex::new(0));
        let count = attempt_count.clone();

        let result: Result<i32> = policy
            .execute("test_op", || {
                let count = count.clone();
                async move {
                    *count.lock().await += 1;
                    Err(StockError::ConfigError("bad".to_string()))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(*attempt_count.lock().await, 1);
    }

    #[tokio::test]
    async fn test_no_retry_runs_once() {
        let policy = RetryPolicy::no_retry();
        let attempt_count = Arc::new(Mutex::new(0));
        let count = attempt_count.clone();

        let result: Result<i32> = policy
            .execute("test_op", || {
                let count = count.clone();
                async move {
                    *count.lock().await += 1;
                    Err(unavailable())
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(*attempt_count.lock().await, 1);
    }
}
