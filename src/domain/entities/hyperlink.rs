//! Hyperlink entity as seen by the validator.

use serde::{Deserialize, Serialize};

/// A hyperlink submitted for validation.
///
/// Owned by the document it was read from. Only [`display_text`](Self::display_text)
/// ever changes, and only through the repair service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    pub id: String,
    pub original_url: String,
    pub display_text: String,
}

impl Hyperlink {
    /// Creates a new Hyperlink instance.
    pub fn new(
        id: impl Into<String>,
        original_url: impl Into<String>,
        display_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            original_url: original_url.into(),
            display_text: display_text.into(),
        }
    }
}
