//! Reachability and expiration checks for hyperlink targets.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::clients::LinkProbe;
use crate::domain::entities::LinkStatus;
use crate::error::{Cancelled, NetworkError, RetryError};
use crate::infrastructure::retry::{RetryExecutor, RetryPolicy};

/// Page phrases that mark the target content as expired.
///
/// Matched case-insensitively against the fetched body.
pub const EXPIRATION_PHRASES: &[&str] = &[
    "expired",
    "no longer available",
    "content removed",
    "page not found",
    "access denied",
    "content unavailable",
];

/// Outcome of an accessibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityReport {
    pub status: LinkStatus,
    pub message: Option<String>,
}

impl AccessibilityReport {
    fn new(status: LinkStatus, message: Option<String>) -> Self {
        Self { status, message }
    }
}

/// Classifies a hyperlink target as valid, not found, invalid or expired.
///
/// Every remote call runs under the network retry policy. Probe failures that
/// survive retries count as "not accessible"; only cancellation escapes as an
/// error.
pub struct AccessibilityChecker {
    probe: Arc<dyn LinkProbe>,
    retry: RetryExecutor,
    policy: RetryPolicy<NetworkError>,
}

impl AccessibilityChecker {
    pub fn new(probe: Arc<dyn LinkProbe>, retry: RetryExecutor) -> Self {
        Self {
            probe,
            retry,
            policy: RetryPolicy::network(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy<NetworkError>) -> Self {
        self.policy = policy;
        self
    }

    /// Checks `url`.
    ///
    /// 1. A reachability probe. If it fails, a status fetch decides between
    ///    `NotFound` (404/410) and `Invalid`.
    /// 2. If reachable, the page body is scanned for [`EXPIRATION_PHRASES`];
    ///    a hit yields `Expired`, otherwise `Valid`.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancel` fires before the check completes.
    pub async fn check(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<AccessibilityReport, Cancelled> {
        let probe = &self.probe;

        let reachable = match self
            .retry
            .execute(&self.policy, cancel, move || probe.probe(url))
            .await
        {
            Ok(reachable) => reachable,
            Err(RetryError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                warn!(url, error = %e, "Reachability probe failed");
                false
            }
        };

        if !reachable {
            return self.classify_unreachable(url, cancel).await;
        }

        let body = match self
            .retry
            .execute(&self.policy, cancel, move || probe.fetch_content(url))
            .await
        {
            Ok(body) => body,
            Err(RetryError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                warn!(url, error = %e, "Content fetch failed, expiration not checked");
                return Ok(AccessibilityReport::new(LinkStatus::Valid, None));
            }
        };

        match find_expiration_phrase(&body) {
            Some(phrase) => {
                debug!(url, phrase, "Expiration marker found");
                Ok(AccessibilityReport::new(
                    LinkStatus::Expired,
                    Some(format!("Content indicates expiration: '{}'", phrase)),
                ))
            }
            None => Ok(AccessibilityReport::new(LinkStatus::Valid, None)),
        }
    }

    async fn classify_unreachable(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<AccessibilityReport, Cancelled> {
        let probe = &self.probe;

        match self
            .retry
            .execute(&self.policy, cancel, move || probe.fetch_status(url))
            .await
        {
            Ok(status @ (404 | 410)) => Ok(AccessibilityReport::new(
                LinkStatus::NotFound,
                Some(format!("Target not found (HTTP {})", status)),
            )),
            Ok(status) => Ok(AccessibilityReport::new(
                LinkStatus::Invalid,
                Some(format!("Target not accessible (HTTP {})", status)),
            )),
            Err(RetryError::Cancelled) => Err(Cancelled),
            Err(e) => Ok(AccessibilityReport::new(
                LinkStatus::Invalid,
                Some(format!("Target not accessible: {}", e)),
            )),
        }
    }
}

/// Returns the first expiration phrase contained in `body`, ignoring case.
pub fn find_expiration_phrase(body: &str) -> Option<&'static str> {
    let lower = body.to_lowercase();
    EXPIRATION_PHRASES
        .iter()
        .copied()
        .find(|phrase| lower.contains(phrase))
}
