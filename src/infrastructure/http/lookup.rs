//! Metadata lookup client implementations.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::clients::LookupClient;
use crate::domain::entities::DocumentRecord;
use crate::error::NetworkError;

/// Request body sent to the lookup API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    lookup_ids: &'a [String],
}

/// Response body returned by the lookup API.
#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<DocumentRecord>,
}

/// Lookup client that POSTs `{"lookupIds": [...]}` to the lookup API.
pub struct HttpLookupClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpLookupClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl LookupClient for HttpLookupClient {
    async fn lookup(&self, lookup_ids: &[String]) -> Result<Vec<DocumentRecord>, NetworkError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&LookupRequest { lookup_ids });

        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request.send().await?.error_for_status()?;
        let body: LookupResponse = response.json().await?;

        debug!(
            requested = lookup_ids.len(),
            returned = body.results.len(),
            "Lookup API responded"
        );
        Ok(body.results)
    }
}

/// Canned lookup payload served in test mode.
const CANNED_LOOKUP_PAYLOAD: &str = r#"{
  "results": [
    {
      "documentId": "DOC-0001",
      "contentId": "100001",
      "title": "Operations Handbook",
      "status": "Released",
      "lookupId": "TSRC-OPS-000001"
    },
    {
      "documentId": "DOC-0042",
      "contentId": "12345",
      "title": "Leave Policy",
      "status": "Released",
      "lookupId": "CMS-HR-000042"
    },
    {
      "documentId": "DOC-0777",
      "contentId": "100777",
      "title": "Legacy Procurement Guide",
      "status": "Expired",
      "lookupId": "TSRC-LEG-000777"
    }
  ]
}"#;

/// Lookup client used in test mode; answers from a fixed JSON payload.
pub struct OfflineLookupClient {
    records: Vec<DocumentRecord>,
}

impl OfflineLookupClient {
    /// Creates a client serving the built-in canned payload.
    pub fn new() -> Self {
        debug!("Using OfflineLookupClient (test mode)");
        let records = Self::parse(CANNED_LOOKUP_PAYLOAD).unwrap_or_else(|e| {
            error!(error = %e, "Canned lookup payload is invalid");
            Vec::new()
        });
        Self { records }
    }

    /// Creates a client serving a caller-supplied payload.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Decode`] if the payload is not a lookup response.
    pub fn from_json(payload: &str) -> Result<Self, NetworkError> {
        Ok(Self {
            records: Self::parse(payload)?,
        })
    }

    fn parse(payload: &str) -> Result<Vec<DocumentRecord>, NetworkError> {
        serde_json::from_str::<LookupResponse>(payload)
            .map(|body| body.results)
            .map_err(|e| NetworkError::Decode(e.to_string()))
    }
}

impl Default for OfflineLookupClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupClient for OfflineLookupClient {
    async fn lookup(&self, lookup_ids: &[String]) -> Result<Vec<DocumentRecord>, NetworkError> {
        Ok(self
            .records
            .iter()
            .filter(|record| {
                lookup_ids
                    .iter()
                    .any(|id| id.eq_ignore_ascii_case(&record.lookup_id))
            })
            .cloned()
            .collect())
    }
}
