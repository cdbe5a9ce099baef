//! Reachability probe implementations.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::domain::clients::LinkProbe;
use crate::error::NetworkError;
use crate::infrastructure::retry::is_retryable_network;

/// Builds the shared HTTP client used by the probe and the lookup client.
///
/// # Errors
///
/// Returns [`NetworkError::Transport`] if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration) -> Result<Client, NetworkError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| NetworkError::Transport(format!("Failed to build HTTP client: {}", e)))
}

/// Surfaces transient statuses (408, 429, 5xx gateway errors) as errors so
/// the network retry policy sees them; final statuses pass through.
fn final_status(code: u16) -> Result<u16, NetworkError> {
    let error = NetworkError::Status(code);
    if is_retryable_network(&error) {
        Err(error)
    } else {
        Ok(code)
    }
}

/// Probe backed by real HTTP requests.
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkProbe for ReqwestProbe {
    async fn probe(&self, url: &str) -> Result<bool, NetworkError> {
        let response = self.client.head(url).send().await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "HEAD probe");
        final_status(status.as_u16())?;
        Ok(status.is_success())
    }

    async fn fetch_content(&self, url: &str) -> Result<String, NetworkError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn fetch_status(&self, url: &str) -> Result<u16, NetworkError> {
        let response = self.client.get(url).send().await?;
        final_status(response.status().as_u16())
    }
}

/// Probe used in test mode: every target is reachable with an empty page.
#[derive(Debug, Default)]
pub struct OfflineProbe;

impl OfflineProbe {
    pub fn new() -> Self {
        debug!("Using OfflineProbe (test mode)");
        Self
    }
}

#[async_trait]
impl LinkProbe for OfflineProbe {
    async fn probe(&self, _url: &str) -> Result<bool, NetworkError> {
        Ok(true)
    }

    async fn fetch_content(&self, _url: &str) -> Result<String, NetworkError> {
        Ok(String::new())
    }

    async fn fetch_status(&self, _url: &str) -> Result<u16, NetworkError> {
        Ok(200)
    }
}
