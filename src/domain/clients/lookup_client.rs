//! Client trait for the metadata lookup service.

use crate::domain::entities::DocumentRecord;
use crate::error::NetworkError;
use async_trait::async_trait;

/// Client for the authoritative metadata lookup service.
///
/// The service accepts a batch of lookup ids and returns the records it knows
/// about. Unknown ids are simply absent from the response.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpLookupClient`] - POST to the lookup API
/// - [`crate::infrastructure::http::OfflineLookupClient`] - canned payload for test mode
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupClient: Send + Sync {
    /// Resolves lookup ids to metadata records.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] on transport failures, non-success statuses
    /// or an undecodable response body.
    async fn lookup(&self, lookup_ids: &[String]) -> Result<Vec<DocumentRecord>, NetworkError>;
}
