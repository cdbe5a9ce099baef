//! Client trait for reachability probes and content fetches.

use crate::error::NetworkError;
use async_trait::async_trait;

/// Network boundary used by the accessibility checker.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::ReqwestProbe`] - real HTTP requests
/// - [`crate::infrastructure::http::OfflineProbe`] - always reachable, for test mode
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkProbe: Send + Sync {
    /// Lightweight reachability check (HEAD-style).
    ///
    /// Returns `Ok(true)` for a success status and `Ok(false)` for any other
    /// final status. Transient statuses are returned as
    /// [`NetworkError::Status`] so callers can retry them.
    async fn probe(&self, url: &str) -> Result<bool, NetworkError>;

    /// Fetches the page body as text.
    async fn fetch_content(&self, url: &str) -> Result<String, NetworkError>;

    /// Fetches the page and returns only its HTTP status code.
    ///
    /// Transient statuses are returned as [`NetworkError::Status`].
    async fn fetch_status(&self, url: &str) -> Result<u16, NetworkError>;
}
