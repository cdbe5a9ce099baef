//! Authoritative document metadata returned by the lookup service.

use serde::{Deserialize, Serialize};

/// Metadata for a managed document, keyed by lookup id.
///
/// Records either come from the lookup service or are synthesized locally
/// when the service has no match; synthesized records carry no title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub content_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub lookup_id: String,
    #[serde(skip)]
    pub synthetic: bool,
}

impl DocumentRecord {
    /// Builds a placeholder record for a lookup id the service does not know.
    pub fn synthetic(lookup_id: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self {
            document_id: String::new(),
            content_id: content_id.into(),
            title: String::new(),
            status: "Unknown".to_string(),
            lookup_id: lookup_id.into(),
            synthetic: true,
        }
    }

    /// Returns true if the record came from the lookup service and has a title.
    pub fn is_authoritative(&self) -> bool {
        !self.synthetic && !self.title.trim().is_empty()
    }

    /// Returns true if the lookup service reports the document as expired.
    pub fn is_expired(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("expired")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_lookup_payload() {
        let record: DocumentRecord = serde_json::from_str(
            r#"{"documentId":"D1","contentId":"123456","title":"Policy","status":"Released","lookupId":"TSRC-OPS-000001"}"#,
        )
        .unwrap();

        assert_eq!(record.document_id, "D1");
        assert_eq!(record.content_id, "123456");
        assert!(record.is_authoritative());
        assert!(!record.is_expired());
    }

    #[test]
    fn test_missing_fields_default() {
        let record: DocumentRecord = serde_json::from_str(r#"{"lookupId":"X"}"#).unwrap();
        assert_eq!(record.lookup_id, "X");
        assert!(record.title.is_empty());
        assert!(!record.is_authoritative());
    }

    #[test]
    fn test_synthetic_record_is_not_authoritative() {
        let record = DocumentRecord::synthetic("TSRC-OPS-000001", "012345");
        assert!(record.synthetic);
        assert!(!record.is_authoritative());
        assert_eq!(record.content_id, "012345");
    }

    #[test]
    fn test_expired_status_case_insensitive() {
        let mut record = DocumentRecord::synthetic("X", "000001");
        record.status = " EXPIRED ".to_string();
        assert!(record.is_expired());
    }
}
