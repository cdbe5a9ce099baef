#![allow(dead_code)]

use std::sync::Arc;

use link_repair::config::Config;
use link_repair::domain::entities::{ContentNode, Document, HyperlinkElement, Run, RunProperties};
use link_repair::infrastructure::http::{
    HttpLookupClient, OfflineLookupClient, OfflineProbe, ReqwestProbe, build_http_client,
};
use link_repair::infrastructure::retry::RetryExecutor;
use link_repair::state::AppState;
use serde_json::{Value, json};

/// Configuration with short retry delays, pointed at `lookup_api_url`.
pub fn test_config(lookup_api_url: &str) -> Config {
    Config {
        lookup_api_url: lookup_api_url.to_string(),
        lookup_api_key: Some("test-key".to_string()),
        test_mode: false,
        max_concurrency: 4,
        request_timeout_seconds: 5,
        content_id_cache_ttl_seconds: 86_400,
        lookup_cache_ttl_seconds: 1_800,
        network_max_retries: 2,
        network_base_delay_ms: 10,
        network_max_delay_ms: 20,
        revision_author: "Integration Test".to_string(),
        log_level: "debug".to_string(),
        log_format: "text".to_string(),
    }
}

/// Pipeline backed by real HTTP clients.
pub fn http_state(config: &Config) -> AppState {
    http_state_with_retry(config, RetryExecutor::new())
}

pub fn http_state_with_retry(config: &Config, retry: RetryExecutor) -> AppState {
    let client = build_http_client(config.request_timeout()).unwrap();
    let lookup = HttpLookupClient::new(
        client.clone(),
        config.lookup_api_url.clone(),
        config.lookup_api_key.clone(),
    );
    AppState::new(
        Arc::new(lookup),
        Arc::new(ReqwestProbe::new(client)),
        config,
        retry,
    )
}

/// Pipeline backed by the canned offline clients.
pub fn offline_state() -> AppState {
    let mut config = test_config("");
    config.test_mode = true;
    AppState::new(
        Arc::new(OfflineLookupClient::new()),
        Arc::new(OfflineProbe::new()),
        &config,
        RetryExecutor::new(),
    )
}

pub fn lookup_record(lookup_id: &str, content_id: &str, title: &str, status: &str) -> Value {
    json!({
        "documentId": format!("DOC-{}", lookup_id),
        "contentId": content_id,
        "title": title,
        "status": status,
        "lookupId": lookup_id
    })
}

pub fn hyperlink_style() -> RunProperties {
    RunProperties {
        style: Some("Hyperlink".to_string()),
        underline: Some("single".to_string()),
        color: Some("0563C1".to_string()),
        ..Default::default()
    }
}

pub fn hyperlink(id: &str, target: &str, text: &str) -> HyperlinkElement {
    HyperlinkElement {
        id: id.to_string(),
        target: Some(target.to_string()),
        anchor: None,
        tooltip: Some(format!("Open {}", text)),
        history: true,
        content: Some(vec![ContentNode::Run(Run::new(text, Some(hyperlink_style())))]),
    }
}

pub fn document(hyperlinks: Vec<HyperlinkElement>) -> Document {
    Document {
        hyperlinks,
        last_revision_id: 0,
    }
}
