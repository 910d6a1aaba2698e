//! Bounded retry with exponential backoff.
//!
//! Adapted for capture attempts: the caller supplies a classification
//! predicate, and only failures it marks transient are retried. The
//! attempt count is reported back so retries stay observable in the
//! per-capture result records.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Retry behavior for one capture attempt chain.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries, not counting the initial attempt.
    pub max_retries: u32,
    /// Base delay, doubled each retry.
    pub base_delay: Duration,
    /// Cap on the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        delay.min(self.max_delay)
    }
}

/// Terminal result of a retried operation, with the number of tries made.
#[derive(Debug)]
pub struct Retried<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Run `operation` until it succeeds, fails permanently, or the retry
/// bound is exhausted. `transient` decides whether a failure is worth
/// another try.
pub async fn retry_classified<F, Fut, T, E, P>(
    policy: &RetryPolicy,
    operation_name: &str,
    transient: P,
    operation: F,
) -> Retried<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                return Retried {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(e) if attempt <= policy.max_retries && transient(&e) => {
                let delay = policy.delay_for_attempt(attempt);
                debug!(
                    "{} attempt {} failed, retrying in {:?}: {}",
                    operation_name, attempt, delay, e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                return Retried {
                    result: Err(e),
                    attempts: attempt,
                }
            }
        }
    }
}
