//! Pipeline wiring.

use std::sync::Arc;

use tracing::info;

use crate::application::services::{
    AccessibilityChecker, BatchRunner, HyperlinkValidator, MetadataService, RepairService,
};
use crate::config::Config;
use crate::domain::clients::{LinkProbe, LookupClient};
use crate::error::NetworkError;
use crate::infrastructure::document_store::JsonDocumentStore;
use crate::infrastructure::http::{
    HttpLookupClient, OfflineLookupClient, OfflineProbe, ReqwestProbe, build_http_client,
};
use crate::infrastructure::retry::RetryExecutor;

/// Shared handles to every pipeline service.
///
/// Cheap to clone; all services sit behind `Arc`s. The caches live inside
/// [`MetadataService`], so two `AppState`s built separately do not share them.
#[derive(Clone)]
pub struct AppState {
    pub metadata: Arc<MetadataService>,
    pub validator: Arc<HyperlinkValidator>,
    pub batch: Arc<BatchRunner>,
    pub repair: Arc<RepairService>,
    pub store: JsonDocumentStore,
}

impl AppState {
    /// Builds the pipeline over explicit lookup and probe clients.
    ///
    /// Every service shares `retry`, so its observer sees all retries.
    pub fn new(
        lookup: Arc<dyn LookupClient>,
        probe: Arc<dyn LinkProbe>,
        config: &Config,
        retry: RetryExecutor,
    ) -> Self {
        let metadata = Arc::new(
            MetadataService::new(lookup, retry.clone())
                .with_policy(config.network_policy())
                .with_ttls(config.lookup_cache_ttl(), config.content_id_cache_ttl()),
        );
        let accessibility = Arc::new(
            AccessibilityChecker::new(probe, retry.clone()).with_policy(config.network_policy()),
        );
        let validator = Arc::new(HyperlinkValidator::new(Arc::clone(&metadata), accessibility));
        let batch = Arc::new(BatchRunner::new(
            Arc::clone(&validator),
            config.max_concurrency,
        ));

        Self {
            metadata,
            validator,
            batch,
            repair: Arc::new(RepairService::new(config.revision_author.clone())),
            store: JsonDocumentStore::new(retry),
        }
    }

    /// Builds the pipeline with HTTP clients, or offline clients in test mode.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config, retry: RetryExecutor) -> Result<Self, NetworkError> {
        if config.test_mode {
            info!("Test mode: using offline lookup client and probe");
            return Ok(Self::new(
                Arc::new(OfflineLookupClient::new()),
                Arc::new(OfflineProbe::new()),
                config,
                retry,
            ));
        }

        let client = build_http_client(config.request_timeout())?;
        let lookup = HttpLookupClient::new(
            client.clone(),
            config.lookup_api_url.clone(),
            config.lookup_api_key.clone(),
        );

        Ok(Self::new(
            Arc::new(lookup),
            Arc::new(ReqwestProbe::new(client)),
            config,
            retry,
        ))
    }
}
