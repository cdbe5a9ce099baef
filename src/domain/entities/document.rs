//! In-memory model of the hyperlink elements of an open document.
//!
//! Only the parts of the document the pipeline touches are modeled: each
//! hyperlink element with its non-content attributes and its content nodes
//! (formatted text runs and tracked deletions/insertions).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Hyperlink;
use crate::error::DocumentError;

/// Character formatting carried by a text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProperties {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Font size in half-points.
    #[serde(default)]
    pub size: Option<u32>,
}

/// A run of text sharing one set of character formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default)]
    pub properties: Option<RunProperties>,
    pub text: String,
}

impl Run {
    pub fn new(text: impl Into<String>, properties: Option<RunProperties>) -> Self {
        Self {
            properties,
            text: text.into(),
        }
    }
}

/// Attribution attached to a tracked edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: u32,
    pub author: String,
    pub date: DateTime<Utc>,
}

/// A child node of a hyperlink element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    Run(Run),
    /// Content marked as deleted by a tracked edit; still present in the document.
    Deleted {
        revision: Revision,
        content: Vec<ContentNode>,
    },
    /// Content added by a tracked edit.
    Inserted {
        revision: Revision,
        content: Vec<ContentNode>,
    },
}

impl ContentNode {
    fn visible_text(&self, out: &mut String) {
        match self {
            Self::Run(run) => out.push_str(&run.text),
            Self::Inserted { content, .. } => content.iter().for_each(|n| n.visible_text(out)),
            Self::Deleted { .. } => {}
        }
    }

    fn first_run(&self) -> Option<&Run> {
        match self {
            Self::Run(run) => Some(run),
            Self::Deleted { content, .. } | Self::Inserted { content, .. } => {
                content.iter().find_map(ContentNode::first_run)
            }
        }
    }

    fn max_revision_id(&self) -> u32 {
        match self {
            Self::Run(_) => 0,
            Self::Deleted { revision, content } | Self::Inserted { revision, content } => content
                .iter()
                .map(ContentNode::max_revision_id)
                .fold(revision.id, u32::max),
        }
    }
}

/// A hyperlink element inside a document.
///
/// `target`, `anchor`, `tooltip` and `history` are non-content attributes and
/// are never touched by text mutation. `content` is `None` when the element has
/// no content root at all, which mutation treats as a structural failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperlinkElement {
    pub id: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub history: bool,
    #[serde(default)]
    pub content: Option<Vec<ContentNode>>,
}

impl HyperlinkElement {
    /// Full address of the hyperlink: target plus `#anchor` when present.
    pub fn url(&self) -> String {
        let target = self.target.as_deref().unwrap_or_default();
        match self.anchor.as_deref() {
            Some(anchor) if !anchor.is_empty() => format!("{}#{}", target, anchor),
            _ => target.to_string(),
        }
    }

    /// Text a reader currently sees; tracked deletions are skipped.
    pub fn display_text(&self) -> String {
        let mut text = String::new();
        for node in self.content.iter().flatten() {
            node.visible_text(&mut text);
        }
        text
    }

    /// Formatting of the first text run, searching inside tracked edits too.
    pub fn first_run_properties(&self) -> Option<&RunProperties> {
        self.content
            .iter()
            .flatten()
            .find_map(ContentNode::first_run)
            .and_then(|run| run.properties.as_ref())
    }

    pub fn to_hyperlink(&self) -> Hyperlink {
        Hyperlink::new(self.id.clone(), self.url(), self.display_text())
    }

    fn max_revision_id(&self) -> u32 {
        self.content
            .iter()
            .flatten()
            .map(ContentNode::max_revision_id)
            .max()
            .unwrap_or(0)
    }
}

/// An open document's hyperlink elements.
///
/// Callers hold the document exclusively (`&mut`) while mutating it; the
/// pipeline never opens or closes the underlying file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub hyperlinks: Vec<HyperlinkElement>,
    #[serde(default)]
    pub last_revision_id: u32,
}

impl Document {
    /// Snapshot of every hyperlink for validation.
    pub fn hyperlinks(&self) -> Vec<Hyperlink> {
        self.hyperlinks
            .iter()
            .map(HyperlinkElement::to_hyperlink)
            .collect()
    }

    pub fn hyperlink_mut(&mut self, id: &str) -> Option<&mut HyperlinkElement> {
        self.hyperlinks.iter_mut().find(|h| h.id == id)
    }

    /// Allocates a revision id unique within this document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Malformed`] once the id space is used up.
    pub fn next_revision_id(&mut self) -> Result<u32, DocumentError> {
        let existing = self
            .hyperlinks
            .iter()
            .map(HyperlinkElement::max_revision_id)
            .max()
            .unwrap_or(0);
        self.last_revision_id = self
            .last_revision_id
            .max(existing)
            .checked_add(1)
            .ok_or_else(|| DocumentError::Malformed("revision ids exhausted".to_string()))?;
        Ok(self.last_revision_id)
    }
}
