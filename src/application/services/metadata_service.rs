//! Cached metadata resolution for lookup ids.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::clients::LookupClient;
use crate::domain::entities::DocumentRecord;
use crate::error::{NetworkError, RetryError};
use crate::infrastructure::cache::{MemoryCache, content_id_key, record_key};
use crate::infrastructure::retry::{RetryExecutor, RetryPolicy};
use crate::utils::content_id::{generate_content_id, is_valid_content_id, pad_content_id};

/// Default lifetime of a resolved metadata record.
pub const DEFAULT_RECORD_TTL: Duration = Duration::from_secs(30 * 60);
/// Default lifetime of a generated content id.
pub const DEFAULT_CONTENT_ID_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Resolves lookup ids to [`DocumentRecord`]s.
///
/// Lookups go through the retry engine under the network policy and are
/// cached per lookup id, so one id costs at most one remote call per TTL
/// window even when many hyperlinks share it. Ids the lookup service does not
/// know resolve to a synthetic record whose content id is generated locally.
pub struct MetadataService {
    client: Arc<dyn LookupClient>,
    retry: RetryExecutor,
    policy: RetryPolicy<NetworkError>,
    records: MemoryCache<DocumentRecord>,
    content_ids: MemoryCache<String>,
    record_ttl: Duration,
    content_id_ttl: Duration,
}

impl MetadataService {
    /// Creates a service with the default network policy and TTLs.
    pub fn new(client: Arc<dyn LookupClient>, retry: RetryExecutor) -> Self {
        Self {
            client,
            retry,
            policy: RetryPolicy::network(),
            records: MemoryCache::new("records"),
            content_ids: MemoryCache::new("content_ids"),
            record_ttl: DEFAULT_RECORD_TTL,
            content_id_ttl: DEFAULT_CONTENT_ID_TTL,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy<NetworkError>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ttls(mut self, record_ttl: Duration, content_id_ttl: Duration) -> Self {
        self.record_ttl = record_ttl;
        self.content_id_ttl = content_id_ttl;
        self
    }

    /// Returns the metadata record for `lookup_id`.
    ///
    /// The returned content id is always six digits.
    ///
    /// # Errors
    ///
    /// - [`RetryError::Exhausted`] if the lookup kept failing with retryable errors
    /// - [`RetryError::Operation`] for a non-retryable lookup failure
    /// - [`RetryError::Cancelled`] if `cancel` fired first
    ///
    /// Failures are not cached; the next call tries again.
    pub async fn resolve(
        &self,
        lookup_id: &str,
        cancel: &CancellationToken,
    ) -> Result<DocumentRecord, RetryError<NetworkError>> {
        self.records
            .get_or_fetch(&record_key(lookup_id), self.record_ttl, || {
                self.fetch_record(lookup_id, cancel)
            })
            .await
    }

    /// Returns the locally generated content id for `lookup_id`.
    pub async fn content_id_for(&self, lookup_id: &str) -> String {
        let generated = self
            .content_ids
            .get_or_fetch(&content_id_key(lookup_id), self.content_id_ttl, || async {
                Ok::<_, Infallible>(pad_content_id(&generate_content_id(lookup_id)))
            })
            .await;

        match generated {
            Ok(content_id) => content_id,
            Err(never) => match never {},
        }
    }

    async fn fetch_record(
        &self,
        lookup_id: &str,
        cancel: &CancellationToken,
    ) -> Result<DocumentRecord, RetryError<NetworkError>> {
        let ids = vec![lookup_id.to_string()];
        let ids = &ids;
        let client = &self.client;

        let records = self
            .retry
            .execute(&self.policy, cancel, move || client.lookup(ids))
            .await?;

        let found = records.into_iter().find(|record| {
            record.lookup_id.is_empty() || record.lookup_id.eq_ignore_ascii_case(lookup_id)
        });

        match found {
            Some(mut record) => {
                if record.lookup_id.is_empty() {
                    record.lookup_id = lookup_id.to_string();
                }

                let padded = pad_content_id(&record.content_id);
                record.content_id = if is_valid_content_id(&padded) {
                    padded
                } else {
                    debug!(lookup_id, raw = %record.content_id, "Record has no usable content id");
                    self.content_id_for(lookup_id).await
                };

                info!(
                    lookup_id,
                    document_id = %record.document_id,
                    content_id = %record.content_id,
                    "Metadata resolved"
                );
                Ok(record)
            }
            None => {
                let content_id = self.content_id_for(lookup_id).await;
                warn!(lookup_id, %content_id, "No metadata record, using generated content id");
                Ok(DocumentRecord::synthetic(lookup_id, content_id))
            }
        }
    }
}
