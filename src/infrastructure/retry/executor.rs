//! Executes operations under a [`RetryPolicy`].

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::policy::RetryPolicy;
use crate::error::RetryError;

/// Snapshot handed to observers before each retry.
#[derive(Debug, Clone)]
pub struct RetryContext {
    /// Number of the attempt that just failed (1-based).
    pub attempt: u32,
    pub max_attempts: u32,
    pub elapsed: Duration,
    /// Delay before the next attempt.
    pub delay: Duration,
    pub last_error: String,
    pub policy_name: String,
}

/// Receives a [`RetryContext`] every time an operation is about to be retried.
pub trait RetryObserver: Send + Sync {
    fn on_retry(&self, context: &RetryContext);
}

/// Runs fallible async operations with bounded, cancellable retries.
///
/// Cancellation is checked before every attempt and while sleeping between
/// attempts; a cancelled operation yields [`RetryError::Cancelled`] and is
/// never retried.
#[derive(Clone, Default)]
pub struct RetryExecutor {
    observer: Option<Arc<dyn RetryObserver>>,
}

impl RetryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(observer: Arc<dyn RetryObserver>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    /// Executes `operation` until it succeeds, fails non-retryably, or the
    /// policy's attempts are used up.
    ///
    /// The wait before retry `n` is `policy.delay_for(n - 1)`, so the first
    /// retry waits `BaseDelay` for every backoff type (jittered when the
    /// policy applies jitter).
    ///
    /// # Errors
    ///
    /// - [`RetryError::Operation`] if the policy refuses to retry a failure
    /// - [`RetryError::Exhausted`] if the final attempt fails
    /// - [`RetryError::Cancelled`] if `cancel` fires
    pub async fn execute<T, E, F, Fut>(
        &self,
        policy: &RetryPolicy<E>,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, RetryError<E>>
    where
        E: StdError + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let started = Instant::now();
        let max_attempts = policy.max_attempts();
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                debug!(policy = policy.name(), attempt, "Cancelled before attempt");
                return Err(RetryError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                outcome = operation() => outcome,
            };

            let error = match outcome {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(policy = policy.name(), attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !policy.should_retry(&error) {
                debug!(
                    policy = policy.name(),
                    attempt,
                    error = %error,
                    "Failure is not retryable"
                );
                return Err(RetryError::Operation(error));
            }

            if attempt >= max_attempts {
                warn!(
                    policy = policy.name(),
                    attempts = attempt,
                    error = %error,
                    "Retries exhausted"
                );
                metrics::counter!("retry_exhausted_total", "policy" => policy.name().to_string())
                    .increment(1);
                return Err(RetryError::Exhausted {
                    policy: policy.name().to_string(),
                    attempts: attempt,
                    source: error,
                });
            }

            let delay = policy.delay_for(attempt - 1);
            let context = RetryContext {
                attempt,
                max_attempts,
                elapsed: started.elapsed(),
                delay,
                last_error: error.to_string(),
                policy_name: policy.name().to_string(),
            };

            warn!(
                policy = policy.name(),
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Operation failed, retrying"
            );
            metrics::counter!("retry_attempts_total", "policy" => policy.name().to_string())
                .increment(1);
            if let Some(observer) = &self.observer {
                observer.on_retry(&context);
            }

            if cancel.is_cancelled() {
                return Err(RetryError::Cancelled);
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RetryError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}
