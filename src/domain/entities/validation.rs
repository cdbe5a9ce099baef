//! Validation outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a validated hyperlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkStatus {
    Valid,
    Invalid,
    NotFound,
    Expired,
    Error,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing a hyperlink's visible title with the authoritative one.
///
/// `titles_differ` is true iff the case-insensitive comparison of the
/// suffix-stripped display text and the trimmed authoritative title differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleComparisonResult {
    pub content_id: String,
    pub current_title: String,
    pub api_title: String,
    pub titles_differ: bool,
    pub action_taken: String,
}

/// Result of validating a single hyperlink.
///
/// Created fresh for every validation and never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub hyperlink_id: String,
    pub status: LinkStatus,
    pub lookup_id: String,
    pub content_id: String,
    pub document_id: String,
    pub is_expired: bool,
    pub requires_update: bool,
    pub error_message: Option<String>,
    pub title_comparison: Option<TitleComparisonResult>,
}

impl ValidationResult {
    /// Creates an empty result for a hyperlink with the given status.
    pub fn new(hyperlink_id: impl Into<String>, status: LinkStatus) -> Self {
        Self {
            hyperlink_id: hyperlink_id.into(),
            status,
            lookup_id: String::new(),
            content_id: String::new(),
            document_id: String::new(),
            is_expired: status == LinkStatus::Expired,
            requires_update: false,
            error_message: None,
            title_comparison: None,
        }
    }

    /// Creates an `Error` result carrying a message.
    pub fn error(hyperlink_id: impl Into<String>, message: impl Into<String>) -> Self {
        let mut result = Self::new(hyperlink_id, LinkStatus::Error);
        result.error_message = Some(message.into());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result() {
        let result = ValidationResult::error("h1", "boom");
        assert_eq!(result.status, LinkStatus::Error);
        assert_eq!(result.error_message.as_deref(), Some("boom"));
        assert!(!result.requires_update);
    }

    #[test]
    fn test_expired_status_sets_flag() {
        let result = ValidationResult::new("h1", LinkStatus::Expired);
        assert!(result.is_expired);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LinkStatus::NotFound.to_string(), "not_found");
        assert_eq!(LinkStatus::Valid.as_str(), "valid");
    }
}
