//! Bounded concurrent validation of many hyperlinks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::validation_service::{HyperlinkValidator, MESSAGE_CANCELLED};
use crate::domain::entities::{Hyperlink, LinkStatus, ValidationResult};
use crate::domain::progress::ValidationProgress;

/// Default number of validations allowed in flight.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Runs [`HyperlinkValidator::validate`] over a batch with a concurrency cap.
///
/// The cap is a semaphore owned by the runner, so it also bounds concurrent
/// [`run`](Self::run) calls sharing one runner. Each link's outcome is
/// independent: a failing or panicking validation becomes an `Error` result
/// and the rest of the batch continues.
pub struct BatchRunner {
    validator: Arc<HyperlinkValidator>,
    permits: Arc<Semaphore>,
    max_concurrency: usize,
}

impl BatchRunner {
    /// Creates a runner; `max_concurrency` is raised to at least 1.
    pub fn new(validator: Arc<HyperlinkValidator>, max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            validator,
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Validates every hyperlink and returns one result per input.
    ///
    /// Results arrive in completion order, not input order; match them by
    /// `hyperlink_id`. If `progress` is given, one [`ValidationProgress`] is
    /// offered per finished link; a full or closed channel drops the event
    /// instead of stalling the batch.
    pub async fn run(
        &self,
        hyperlinks: Vec<Hyperlink>,
        cancel: &CancellationToken,
        progress: Option<mpsc::Sender<ValidationProgress>>,
    ) -> Vec<ValidationResult> {
        let total = hyperlinks.len();
        info!(total, max_concurrency = self.max_concurrency, "Batch validation started");

        let mut tasks = JoinSet::new();
        let mut task_links = HashMap::with_capacity(total);

        for hyperlink in hyperlinks {
            let hyperlink_id = hyperlink.id.clone();
            let validator = Arc::clone(&self.validator);
            let permits = Arc::clone(&self.permits);
            let cancel = cancel.clone();

            let handle = tasks.spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        return ValidationResult::error(hyperlink.id, MESSAGE_CANCELLED);
                    }
                    permit = permits.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => {
                            return ValidationResult::error(hyperlink.id, "Validation pool closed");
                        }
                    },
                };

                validator.validate(&hyperlink, &cancel).await
            });
            task_links.insert(handle.id(), hyperlink_id);
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next_with_id().await {
            let result = match joined {
                Ok((_, result)) => result,
                Err(e) => {
                    let hyperlink_id = task_links.get(&e.id()).cloned().unwrap_or_default();
                    error!(%hyperlink_id, error = %e, "Validation task failed");
                    ValidationResult::error(hyperlink_id, format!("Validation task failed: {}", e))
                }
            };

            if let Some(sender) = &progress {
                let event = ValidationProgress::new(
                    result.hyperlink_id.clone(),
                    result.status,
                    results.len() + 1,
                    total,
                );
                if let Err(e) = sender.try_send(event) {
                    debug!(error = %e, "Progress event dropped");
                }
            }

            results.push(result);
        }

        let failed = results
            .iter()
            .filter(|r| r.status == LinkStatus::Error)
            .count();
        if failed > 0 {
            warn!(total, failed, "Batch validation finished with errors");
        } else {
            info!(total, "Batch validation finished");
        }

        results
    }
}
