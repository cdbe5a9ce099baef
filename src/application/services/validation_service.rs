//! Single-hyperlink validation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::accessibility_service::AccessibilityChecker;
use super::metadata_service::MetadataService;
use crate::domain::entities::{Hyperlink, LinkStatus, ValidationResult};
use crate::error::RetryError;
use crate::utils::lookup_id::extract_lookup_id;
use crate::utils::title::{compare_titles, has_content_id_suffix};

pub const MESSAGE_NO_LOOKUP_ID: &str = "No lookup identifier found in URL";
pub const MESSAGE_CANCELLED: &str = "Validation cancelled";

/// Validates one hyperlink against the metadata service and its live target.
///
/// [`validate`](Self::validate) never fails: every error is folded into the
/// returned [`ValidationResult`].
pub struct HyperlinkValidator {
    metadata: Arc<MetadataService>,
    accessibility: Arc<AccessibilityChecker>,
}

impl HyperlinkValidator {
    pub fn new(metadata: Arc<MetadataService>, accessibility: Arc<AccessibilityChecker>) -> Self {
        Self {
            metadata,
            accessibility,
        }
    }

    /// Produces a [`ValidationResult`] for `hyperlink`.
    ///
    /// The metadata lookup and the accessibility check run concurrently.
    /// Title comparison only happens when an authoritative record with a
    /// title exists.
    pub async fn validate(
        &self,
        hyperlink: &Hyperlink,
        cancel: &CancellationToken,
    ) -> ValidationResult {
        let result = self.run(hyperlink, cancel).await;

        metrics::counter!("link_validations_total", "status" => result.status.as_str())
            .increment(1);
        info!(
            hyperlink_id = %result.hyperlink_id,
            status = %result.status,
            lookup_id = %result.lookup_id,
            requires_update = result.requires_update,
            "Hyperlink validated"
        );

        result
    }

    async fn run(&self, hyperlink: &Hyperlink, cancel: &CancellationToken) -> ValidationResult {
        if cancel.is_cancelled() {
            return ValidationResult::error(&hyperlink.id, MESSAGE_CANCELLED);
        }

        let lookup_id = extract_lookup_id(&hyperlink.original_url);
        if lookup_id.is_empty() {
            debug!(hyperlink_id = %hyperlink.id, url = %hyperlink.original_url, "No lookup id");
            let mut result = ValidationResult::new(&hyperlink.id, LinkStatus::Invalid);
            result.error_message = Some(MESSAGE_NO_LOOKUP_ID.to_string());
            return result;
        }

        let (record, access) = tokio::join!(
            self.metadata.resolve(&lookup_id, cancel),
            self.accessibility.check(&hyperlink.original_url, cancel),
        );

        let Ok(access) = access else {
            return ValidationResult::error(&hyperlink.id, MESSAGE_CANCELLED);
        };

        let record = match record {
            Ok(record) => record,
            Err(RetryError::Cancelled) => {
                return ValidationResult::error(&hyperlink.id, MESSAGE_CANCELLED);
            }
            Err(e) => {
                error!(hyperlink_id = %hyperlink.id, %lookup_id, error = %e, "Metadata lookup failed");
                let mut result =
                    ValidationResult::error(&hyperlink.id, format!("Metadata lookup failed: {}", e));
                result.lookup_id = lookup_id;
                return result;
            }
        };

        let status = match access.status {
            LinkStatus::Valid if record.is_expired() => LinkStatus::Expired,
            status => status,
        };

        let title_comparison = record.is_authoritative().then(|| {
            compare_titles(&record.content_id, &hyperlink.display_text, &record.title)
        });

        let requires_update = title_comparison.as_ref().is_some_and(|comparison| {
            comparison.titles_differ
                || !has_content_id_suffix(&hyperlink.display_text, &record.content_id)
        });

        let mut result = ValidationResult::new(&hyperlink.id, status);
        result.is_expired = status == LinkStatus::Expired || record.is_expired();
        result.lookup_id = lookup_id;
        result.content_id = record.content_id;
        result.document_id = record.document_id;
        result.requires_update = requires_update;
        result.error_message = access.message.or_else(|| {
            (status == LinkStatus::Expired).then(|| "Document is marked as expired".to_string())
        });
        result.title_comparison = title_comparison;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clients::{MockLinkProbe, MockLookupClient};
    use crate::domain::entities::DocumentRecord;
    use crate::error::NetworkError;
    use crate::infrastructure::retry::{RetryExecutor, RetryPolicy, is_retryable_network};
    use crate::utils::title::ACTION_TITLE_DIFFERS;

    const URL: &str = "https://docs.example.com/view/TSRC-OPS-000001";

    fn no_retry() -> RetryPolicy<NetworkError> {
        RetryPolicy::new("network", is_retryable_network).with_max_retries(0)
    }

    fn validator(client: MockLookupClient, probe: MockLinkProbe) -> HyperlinkValidator {
        let metadata = MetadataService::new(Arc::new(client), RetryExecutor::new())
            .with_policy(no_retry());
        let accessibility =
            AccessibilityChecker::new(Arc::new(probe), RetryExecutor::new()).with_policy(no_retry());
        HyperlinkValidator::new(Arc::new(metadata), Arc::new(accessibility))
    }

    fn reachable_probe() -> MockLinkProbe {
        let mut probe = MockLinkProbe::new();
        probe.expect_probe().returning(|_| Ok(true));
        probe
            .expect_fetch_content()
            .returning(|_| Ok("<html>ok</html>".to_string()));
        probe
    }

    fn client_with(title: &'static str, status: &'static str) -> MockLookupClient {
        let mut client = MockLookupClient::new();
        client.expect_lookup().returning(move |_| {
            Ok(vec![DocumentRecord {
                document_id: "DOC-1".to_string(),
                content_id: "12345".to_string(),
                title: title.to_string(),
                status: status.to_string(),
                lookup_id: "TSRC-OPS-000001".to_string(),
                synthetic: false,
            }])
        });
        client
    }

    #[tokio::test]
    async fn test_matching_title_with_suffix_needs_no_update() {
        let validator = validator(client_with("Operations Handbook", "Released"), reachable_probe());
        let link = Hyperlink::new("h1", URL, "Operations Handbook (012345)");

        let result = validator.validate(&link, &CancellationToken::new()).await;

        assert_eq!(result.status, LinkStatus::Valid);
        assert_eq!(result.lookup_id, "TSRC-OPS-000001");
        assert_eq!(result.content_id, "012345");
        assert_eq!(result.document_id, "DOC-1");
        assert!(!result.requires_update);
        assert!(!result.title_comparison.unwrap().titles_differ);
    }

    #[tokio::test]
    async fn test_title_difference_requires_update() {
        let validator = validator(client_with("Operations Handbook v2", "Released"), reachable_probe());
        let link = Hyperlink::new("h1", URL, "Operations Handbook (012345)");

        let result = validator.validate(&link, &CancellationToken::new()).await;

        assert!(result.requires_update);
        let comparison = result.title_comparison.unwrap();
        assert!(comparison.titles_differ);
        assert_eq!(comparison.action_taken, ACTION_TITLE_DIFFERS);
    }

    #[tokio::test]
    async fn test_missing_suffix_requires_update() {
        let validator = validator(client_with("Operations Handbook", "Released"), reachable_probe());
        let link = Hyperlink::new("h1", URL, "operations handbook");

        let result = validator.validate(&link, &CancellationToken::new()).await;

        assert!(result.requires_update);
        assert!(!result.title_comparison.unwrap().titles_differ);
    }

    #[tokio::test]
    async fn test_url_without_lookup_id_makes_no_calls() {
        let mut client = MockLookupClient::new();
        client.expect_lookup().never();
        let mut probe = MockLinkProbe::new();
        probe.expect_probe().never();

        let link = Hyperlink::new("h1", "https://www.example.com/about", "About");
        let result = validator(client, probe)
            .validate(&link, &CancellationToken::new())
            .await;

        assert_eq!(result.status, LinkStatus::Invalid);
        assert_eq!(result.error_message.as_deref(), Some(MESSAGE_NO_LOOKUP_ID));
    }

    #[tokio::test]
    async fn test_expired_record_marks_link_expired() {
        let validator = validator(client_with("Legacy Guide", "Expired"), reachable_probe());
        let link = Hyperlink::new("h1", URL, "Legacy Guide (012345)");

        let result = validator.validate(&link, &CancellationToken::new()).await;

        assert_eq!(result.status, LinkStatus::Expired);
        assert!(result.is_expired);
    }

    #[tokio::test]
    async fn test_unknown_record_skips_title_comparison() {
        let mut client = MockLookupClient::new();
        client.expect_lookup().returning(|_| Ok(Vec::new()));

        let link = Hyperlink::new("h1", URL, "Something");
        let result = validator(client, reachable_probe())
            .validate(&link, &CancellationToken::new())
            .await;

        assert_eq!(result.status, LinkStatus::Valid);
        assert!(result.title_comparison.is_none());
        assert!(!result.requires_update);
        assert_eq!(result.content_id.len(), 6);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_folded_into_error_result() {
        let mut client = MockLookupClient::new();
        client
            .expect_lookup()
            .returning(|_| Err(NetworkError::Status(500)));

        let link = Hyperlink::new("h1", URL, "Operations Handbook");
        let result = validator(client, reachable_probe())
            .validate(&link, &CancellationToken::new())
            .await;

        assert_eq!(result.status, LinkStatus::Error);
        assert_eq!(result.lookup_id, "TSRC-OPS-000001");
        assert!(result.error_message.unwrap().contains("Metadata lookup failed"));
    }

    #[tokio::test]
    async fn test_not_found_target() {
        let mut probe = MockLinkProbe::new();
        probe.expect_probe().returning(|_| Ok(false));
        probe.expect_fetch_status().returning(|_| Ok(410));

        let link = Hyperlink::new("h1", URL, "Operations Handbook (012345)");
        let result = validator(client_with("Operations Handbook", "Released"), probe)
            .validate(&link, &CancellationToken::new())
            .await;

        assert_eq!(result.status, LinkStatus::NotFound);
        assert_eq!(result.content_id, "012345");
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let link = Hyperlink::new("h1", URL, "Operations Handbook");
        let result = validator(MockLookupClient::new(), MockLinkProbe::new())
            .validate(&link, &cancel)
            .await;

        assert_eq!(result.status, LinkStatus::Error);
        assert_eq!(result.error_message.as_deref(), Some(MESSAGE_CANCELLED));
    }
}
