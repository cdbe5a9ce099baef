//! Retry policies and backoff schedules.

use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::classify;
use crate::error::{DocumentError, NetworkError, PersistenceError};

/// How the delay between attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffType {
    Fixed,
    Linear,
    Exponential,
    ExponentialWithJitter,
}

type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Immutable description of how an operation is retried.
///
/// One policy exists per failure domain; the predicate decides which failures
/// of that domain are worth another attempt.
///
/// # Examples
///
/// ```ignore
/// let policy = RetryPolicy::new("lookup", |e: &NetworkError| !matches!(e, NetworkError::Dns(_)))
///     .with_max_retries(5)
///     .with_backoff(BackoffType::Exponential, 2.0);
/// ```
pub struct RetryPolicy<E> {
    name: String,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff: BackoffType,
    backoff_multiplier: f64,
    jitter_max_percent: f64,
    should_retry: RetryPredicate<E>,
}

impl<E> RetryPolicy<E> {
    /// Creates a policy with 3 retries and a fixed 1s delay capped at 30s.
    pub fn new(
        name: impl Into<String>,
        should_retry: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff: BackoffType::Fixed,
            backoff_multiplier: 2.0,
            jitter_max_percent: 0.0,
            should_retry: Arc::new(should_retry),
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffType, multiplier: f64) -> Self {
        self.backoff = backoff;
        self.backoff_multiplier = multiplier;
        self
    }

    /// Sets the jitter range as a percentage of the computed delay.
    pub fn with_jitter(mut self, max_percent: f64) -> Self {
        self.jitter_max_percent = max_percent.abs();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn backoff(&self) -> BackoffType {
        self.backoff
    }

    pub fn should_retry(&self, error: &E) -> bool {
        (self.should_retry)(error)
    }

    /// Delay to wait after the attempt with zero-based index `attempt_index`.
    ///
    /// - Fixed: `base`
    /// - Linear: `base * (index + 1)`
    /// - Exponential: `base * multiplier ^ index`
    /// - ExponentialWithJitter: exponential, scaled by a uniform factor in
    ///   `[-jitter%, +jitter%]`, floored at zero
    ///
    /// The result is always clamped to `max_delay`.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let base = self.base_delay.as_nanos() as f64;
        let exponent = i32::try_from(attempt_index).unwrap_or(i32::MAX);

        let nanos = match self.backoff {
            BackoffType::Fixed => base,
            BackoffType::Linear => base * (f64::from(attempt_index) + 1.0),
            BackoffType::Exponential => base * self.backoff_multiplier.powi(exponent),
            BackoffType::ExponentialWithJitter => {
                let exponential = base * self.backoff_multiplier.powi(exponent);
                let percent = if self.jitter_max_percent > 0.0 {
                    rand::rng().random_range(-self.jitter_max_percent..=self.jitter_max_percent)
                } else {
                    0.0
                };
                (exponential * (1.0 + percent / 100.0)).max(0.0)
            }
        };

        let max = self.max_delay.as_nanos() as f64;
        if !nanos.is_finite() || nanos >= max {
            return self.max_delay;
        }
        Duration::from_nanos(nanos as u64)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            max_retries: self.max_retries,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            backoff: self.backoff,
            backoff_multiplier: self.backoff_multiplier,
            jitter_max_percent: self.jitter_max_percent,
            should_retry: Arc::clone(&self.should_retry),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("name", &self.name)
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff", &self.backoff)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("jitter_max_percent", &self.jitter_max_percent)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy<NetworkError> {
    /// Policy for HTTP probes, content fetches and metadata lookups.
    pub fn network() -> Self {
        Self::new("network", classify::is_retryable_network)
            .with_max_retries(3)
            .with_delays(Duration::from_secs(1), Duration::from_secs(30))
            .with_backoff(BackoffType::ExponentialWithJitter, 2.0)
            .with_jitter(25.0)
    }
}

impl RetryPolicy<std::io::Error> {
    /// Policy for reading and writing files that may be held by other processes.
    pub fn file_io() -> Self {
        Self::new("file-io", classify::is_retryable_io)
            .with_max_retries(3)
            .with_delays(Duration::from_millis(500), Duration::from_secs(5))
            .with_backoff(BackoffType::Exponential, 2.0)
    }
}

impl RetryPolicy<DocumentError> {
    /// Policy for loading documents.
    pub fn document_format() -> Self {
        Self::new("document-format", classify::is_retryable_document)
            .with_max_retries(2)
            .with_delays(Duration::from_secs(1), Duration::from_secs(3))
            .with_backoff(BackoffType::Linear, 1.0)
    }
}

impl RetryPolicy<PersistenceError> {
    /// Policy for storage collaborators.
    pub fn persistence() -> Self {
        Self::new("persistence", classify::is_retryable_persistence)
            .with_max_retries(3)
            .with_delays(Duration::from_millis(200), Duration::from_secs(2))
            .with_backoff(BackoffType::Exponential, 2.0)
    }
}
