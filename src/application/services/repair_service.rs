//! Hyperlink display-text mutation and repair.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::entities::{
    ContentNode, Document, HyperlinkElement, LinkStatus, Revision, Run, ValidationResult,
};
use crate::error::DocumentError;
use crate::utils::title::repair_display_text;

/// Default author recorded on tracked edits.
pub const DEFAULT_REVISION_AUTHOR: &str = "Link Repair";

/// Attribution for a tracked replacement.
///
/// Every wrapped segment and the insertion share `author` and `date`. Each
/// live segment takes the next id from `deletion_ids`, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEdit {
    pub author: String,
    pub date: DateTime<Utc>,
    pub deletion_ids: Vec<u32>,
    pub insertion_id: u32,
}

impl TrackedEdit {
    fn revision(&self, id: u32) -> Revision {
        Revision {
            id,
            author: self.author.clone(),
            date: self.date,
        }
    }
}

/// Number of deletion ids a tracked edit of `content` needs: one per run of
/// consecutive nodes not already deleted.
pub fn live_segment_count(content: &[ContentNode]) -> usize {
    let mut segments = 0;
    let mut in_segment = false;
    for node in content {
        let live = !matches!(node, ContentNode::Deleted { .. });
        if live && !in_segment {
            segments += 1;
        }
        in_segment = live;
    }
    segments
}

/// Replaces the visible text of `hyperlink` with `new_text`.
///
/// Without tracking, the content becomes a single run that keeps the
/// formatting of the first existing run. With tracking, each stretch of
/// visible content is wrapped in a deletion where it stands, earlier tracked
/// deletions keep their position, and the new run is appended inside an
/// insertion. Non-content attributes (target, anchor, tooltip, history) are
/// never touched.
///
/// # Errors
///
/// - [`DocumentError::MissingContent`] if the element has no content root
/// - [`DocumentError::Malformed`] if `tracked` carries fewer deletion ids
///   than [`live_segment_count`] requires
///
/// The element is left unchanged on error.
pub fn update_display_text(
    hyperlink: &mut HyperlinkElement,
    new_text: &str,
    tracked: Option<TrackedEdit>,
) -> Result<(), DocumentError> {
    let properties = hyperlink.first_run_properties().cloned();
    let content = hyperlink
        .content
        .as_mut()
        .ok_or_else(|| DocumentError::MissingContent(hyperlink.id.clone()))?;

    let new_run = ContentNode::Run(Run::new(new_text, properties));

    let Some(edit) = tracked else {
        content.clear();
        content.push(new_run);
        return Ok(());
    };

    let needed = live_segment_count(content);
    if edit.deletion_ids.len() < needed {
        return Err(DocumentError::Malformed(format!(
            "hyperlink '{}' needs {} deletion ids, got {}",
            hyperlink.id,
            needed,
            edit.deletion_ids.len()
        )));
    }

    let mut ids = edit.deletion_ids.iter().copied();
    let mut rebuilt = Vec::with_capacity(content.len() + 1);
    let mut segment = Vec::new();
    let mut flush = |segment: &mut Vec<ContentNode>, rebuilt: &mut Vec<ContentNode>| {
        if segment.is_empty() {
            return;
        }
        // count checked above
        let id = ids.next().unwrap_or(edit.insertion_id);
        rebuilt.push(ContentNode::Deleted {
            revision: edit.revision(id),
            content: std::mem::take(segment),
        });
    };

    for node in std::mem::take(content) {
        if matches!(node, ContentNode::Deleted { .. }) {
            flush(&mut segment, &mut rebuilt);
            rebuilt.push(node);
        } else {
            segment.push(node);
        }
    }
    flush(&mut segment, &mut rebuilt);

    rebuilt.push(ContentNode::Inserted {
        revision: edit.revision(edit.insertion_id),
        content: vec![new_run],
    });
    *content = rebuilt;

    Ok(())
}

/// Applies title repairs to an open document.
pub struct RepairService {
    author: String,
}

impl RepairService {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Sets the display text of the hyperlink with id `hyperlink_id`.
    ///
    /// Revision ids for tracked edits are allocated from `document`.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::HyperlinkNotFound`] if no such hyperlink exists
    /// - [`DocumentError::MissingContent`] if it has no content root
    /// - [`DocumentError::Malformed`] if the document has no revision ids left
    pub fn update_display_text(
        &self,
        document: &mut Document,
        hyperlink_id: &str,
        new_text: &str,
        track_changes: bool,
    ) -> Result<(), DocumentError> {
        let segments = document
            .hyperlinks
            .iter()
            .find(|h| h.id == hyperlink_id)
            .ok_or_else(|| DocumentError::HyperlinkNotFound(hyperlink_id.to_string()))?
            .content
            .as_deref()
            .map(live_segment_count);

        let tracked = match segments {
            Some(segments) if track_changes => {
                let deletion_ids = (0..segments)
                    .map(|_| document.next_revision_id())
                    .collect::<Result<Vec<_>, _>>()?;
                Some(TrackedEdit {
                    author: self.author.clone(),
                    date: Utc::now(),
                    deletion_ids,
                    insertion_id: document.next_revision_id()?,
                })
            }
            _ => None,
        };

        let hyperlink = document
            .hyperlink_mut(hyperlink_id)
            .ok_or_else(|| DocumentError::HyperlinkNotFound(hyperlink_id.to_string()))?;
        update_display_text(hyperlink, new_text, tracked)?;

        debug!(hyperlink_id, new_text, track_changes, "Display text updated");
        Ok(())
    }

    /// Rewrites a hyperlink's display text to `"<title> (<content id>)"` when
    /// its validation result calls for it.
    ///
    /// Returns `Ok(false)` when nothing needed to change.
    ///
    /// # Errors
    ///
    /// See [`Self::update_display_text`].
    pub fn apply_repair(
        &self,
        document: &mut Document,
        result: &ValidationResult,
        track_changes: bool,
    ) -> Result<bool, DocumentError> {
        if !result.requires_update || result.status == LinkStatus::Error {
            return Ok(false);
        }
        let Some(comparison) = &result.title_comparison else {
            return Ok(false);
        };

        let new_text = repair_display_text(&comparison.api_title, &result.content_id);
        let current = document
            .hyperlinks
            .iter()
            .find(|h| h.id == result.hyperlink_id)
            .ok_or_else(|| DocumentError::HyperlinkNotFound(result.hyperlink_id.clone()))?
            .display_text();
        if current == new_text {
            return Ok(false);
        }

        self.update_display_text(document, &result.hyperlink_id, &new_text, track_changes)?;
        info!(
            hyperlink_id = %result.hyperlink_id,
            from = %current,
            to = %new_text,
            track_changes,
            "Hyperlink repaired"
        );
        Ok(true)
    }

    /// Applies [`Self::apply_repair`] to every result; returns how many
    /// hyperlinks changed.
    ///
    /// # Errors
    ///
    /// Stops at the first structural failure.
    pub fn apply_repairs(
        &self,
        document: &mut Document,
        results: &[ValidationResult],
        track_changes: bool,
    ) -> Result<usize, DocumentError> {
        let mut repaired = 0;
        for result in results {
            if self.apply_repair(document, result, track_changes)? {
                repaired += 1;
            }
        }
        Ok(repaired)
    }
}

impl Default for RepairService {
    fn default() -> Self {
        Self::new(DEFAULT_REVISION_AUTHOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RunProperties;
    use crate::utils::title::compare_titles;

    fn styled() -> RunProperties {
        RunProperties {
            style: Some("Hyperlink".to_string()),
            bold: true,
            color: Some("0563C1".to_string()),
            ..Default::default()
        }
    }

    fn element(content: Option<Vec<ContentNode>>) -> HyperlinkElement {
        HyperlinkElement {
            id: "h1".to_string(),
            target: Some("https://docs.example.com/TSRC-OPS-000001".to_string()),
            anchor: Some("intro".to_string()),
            tooltip: Some("Open handbook".to_string()),
            history: true,
            content,
        }
    }

    fn document(content: Option<Vec<ContentNode>>) -> Document {
        Document {
            hyperlinks: vec![element(content)],
            last_revision_id: 0,
        }
    }

    fn old_content() -> Option<Vec<ContentNode>> {
        Some(vec![
            ContentNode::Run(Run::new("Old ", Some(styled()))),
            ContentNode::Run(Run::new("Title", None)),
        ])
    }

    fn edit() -> TrackedEdit {
        TrackedEdit {
            author: "Reviewer".to_string(),
            date: Utc::now(),
            deletion_ids: vec![7],
            insertion_id: 8,
        }
    }

    #[test]
    fn test_untracked_replace_keeps_formatting_and_attributes() {
        let mut link = element(old_content());

        update_display_text(&mut link, "New Title (123456)", None).unwrap();

        assert_eq!(
            link.content,
            Some(vec![ContentNode::Run(Run::new(
                "New Title (123456)",
                Some(styled())
            ))])
        );
        assert_eq!(link.display_text(), "New Title (123456)");
        assert_eq!(link.anchor.as_deref(), Some("intro"));
        assert_eq!(link.tooltip.as_deref(), Some("Open handbook"));
        assert!(link.history);
        assert_eq!(
            link.target.as_deref(),
            Some("https://docs.example.com/TSRC-OPS-000001")
        );
    }

    #[test]
    fn test_untracked_replace_without_formatting() {
        let mut link = element(Some(vec![ContentNode::Run(Run::new("Plain", None))]));

        update_display_text(&mut link, "Other", None).unwrap();

        assert_eq!(
            link.content,
            Some(vec![ContentNode::Run(Run::new("Other", None))])
        );
    }

    #[test]
    fn test_untracked_replace_of_empty_content() {
        let mut link = element(Some(Vec::new()));

        update_display_text(&mut link, "Fresh", None).unwrap();

        assert_eq!(link.display_text(), "Fresh");
    }

    #[test]
    fn test_tracked_replace_wraps_deletion_and_insertion() {
        let mut link = element(old_content());
        let edit = edit();

        update_display_text(&mut link, "New Title", Some(edit.clone())).unwrap();

        let content = link.content.as_ref().unwrap();
        assert_eq!(content.len(), 2);
        match &content[0] {
            ContentNode::Deleted { revision, content } => {
                assert_eq!(revision.id, 7);
                assert_eq!(revision.author, "Reviewer");
                assert_eq!(content, old_content().as_ref().unwrap());
            }
            other => panic!("expected deletion, got {:?}", other),
        }
        match &content[1] {
            ContentNode::Inserted { revision, content } => {
                assert_eq!(revision.id, 8);
                assert_eq!(revision.date, edit.date);
                assert_eq!(
                    content,
                    &vec![ContentNode::Run(Run::new("New Title", Some(styled())))]
                );
            }
            other => panic!("expected insertion, got {:?}", other),
        }
        assert_eq!(link.display_text(), "New Title");
        assert_eq!(link.tooltip.as_deref(), Some("Open handbook"));
    }

    #[test]
    fn test_tracked_replace_keeps_earlier_deletions() {
        let earlier = ContentNode::Deleted {
            revision: Revision {
                id: 1,
                author: "Someone".to_string(),
                date: Utc::now(),
            },
            content: vec![ContentNode::Run(Run::new("Ancient", None))],
        };
        let mut link = element(Some(vec![
            earlier.clone(),
            ContentNode::Run(Run::new("Current", None)),
        ]));

        update_display_text(&mut link, "Next", Some(edit())).unwrap();

        let content = link.content.as_ref().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0], earlier);
        assert_eq!(link.display_text(), "Next");
    }

    #[test]
    fn test_tracked_replace_wraps_segments_in_place() {
        let earlier = ContentNode::Deleted {
            revision: Revision {
                id: 1,
                author: "Someone".to_string(),
                date: Utc::now(),
            },
            content: vec![ContentNode::Run(Run::new("X", None))],
        };
        let original = vec![
            ContentNode::Run(Run::new("A", Some(styled()))),
            earlier.clone(),
            ContentNode::Run(Run::new("B", None)),
        ];
        assert_eq!(live_segment_count(&original), 2);
        let mut link = element(Some(original));
        let edit = TrackedEdit {
            deletion_ids: vec![7, 9],
            ..edit()
        };

        update_display_text(&mut link, "AB", Some(edit)).unwrap();

        let content = link.content.as_ref().unwrap();
        assert_eq!(content.len(), 4);
        let wrapped = |node: &ContentNode| match node {
            ContentNode::Deleted { revision, content } => (revision.id, content.clone()),
            other => panic!("expected deletion, got {:?}", other),
        };
        assert_eq!(
            wrapped(&content[0]),
            (7, vec![ContentNode::Run(Run::new("A", Some(styled())))])
        );
        assert_eq!(content[1], earlier);
        assert_eq!(
            wrapped(&content[2]),
            (9, vec![ContentNode::Run(Run::new("B", None))])
        );
        assert!(matches!(&content[3], ContentNode::Inserted { revision, .. } if revision.id == 8));
        assert_eq!(link.display_text(), "AB");
    }

    #[test]
    fn test_tracked_replace_without_enough_ids_is_rejected() {
        let mut link = element(old_content());
        let edit = TrackedEdit {
            deletion_ids: Vec::new(),
            ..edit()
        };

        let err = update_display_text(&mut link, "Next", Some(edit)).unwrap_err();

        assert!(matches!(err, DocumentError::Malformed(_)));
        assert_eq!(link.content, old_content());
    }

    #[test]
    fn test_service_reports_exhausted_revision_ids() {
        let mut doc = document(old_content());
        doc.last_revision_id = u32::MAX;

        let err = RepairService::default()
            .update_display_text(&mut doc, "h1", "Next", true)
            .unwrap_err();

        assert!(matches!(err, DocumentError::Malformed(_)));
        assert_eq!(doc.hyperlinks[0].content, old_content());
    }

    #[test]
    fn test_missing_content_root_is_an_error() {
        let mut link = element(None);

        let err = update_display_text(&mut link, "x", None).unwrap_err();

        assert!(matches!(err, DocumentError::MissingContent(id) if id == "h1"));
        assert!(link.content.is_none());
    }

    #[test]
    fn test_service_allocates_unique_revision_ids() {
        let mut doc = document(old_content());
        doc.last_revision_id = 41;
        let service = RepairService::default();

        service.update_display_text(&mut doc, "h1", "First", true).unwrap();
        service.update_display_text(&mut doc, "h1", "Second", true).unwrap();

        let mut ids = Vec::new();
        for node in doc.hyperlinks[0].content.as_ref().unwrap() {
            match node {
                ContentNode::Deleted { revision, .. } | ContentNode::Inserted { revision, .. } => {
                    assert_eq!(revision.author, DEFAULT_REVISION_AUTHOR);
                    ids.push(revision.id);
                }
                ContentNode::Run(_) => {}
            }
        }
        assert_eq!(ids, vec![42, 44, 45]);
        assert_eq!(doc.hyperlinks[0].display_text(), "Second");
    }

    #[test]
    fn test_service_unknown_hyperlink() {
        let mut doc = document(old_content());

        let err = RepairService::default()
            .update_display_text(&mut doc, "missing", "x", false)
            .unwrap_err();

        assert!(matches!(err, DocumentError::HyperlinkNotFound(id) if id == "missing"));
    }

    fn needs_repair(api_title: &str) -> ValidationResult {
        let mut result = ValidationResult::new("h1", LinkStatus::Valid);
        result.content_id = "123456".to_string();
        result.requires_update = true;
        result.title_comparison = Some(compare_titles("123456", "Old Title", api_title));
        result
    }

    #[test]
    fn test_apply_repair_rewrites_display_text() {
        let mut doc = document(old_content());

        let changed = RepairService::default()
            .apply_repair(&mut doc, &needs_repair("Operations Handbook"), false)
            .unwrap();

        assert!(changed);
        assert_eq!(
            doc.hyperlinks[0].display_text(),
            "Operations Handbook (123456)"
        );
    }

    #[test]
    fn test_apply_repair_skips_when_not_required() {
        let mut doc = document(old_content());
        let mut result = needs_repair("Operations Handbook");
        result.requires_update = false;

        let changed = RepairService::default()
            .apply_repair(&mut doc, &result, true)
            .unwrap();

        assert!(!changed);
        assert_eq!(doc.hyperlinks[0].content, old_content());
    }

    #[test]
    fn test_apply_repairs_counts_changes() {
        let mut doc = document(old_content());
        let mut skipped = needs_repair("Ignored");
        skipped.requires_update = false;

        let repaired = RepairService::default()
            .apply_repairs(&mut doc, &[skipped, needs_repair("Handbook")], true)
            .unwrap();

        assert_eq!(repaired, 1);
        assert_eq!(doc.hyperlinks[0].display_text(), "Handbook (123456)");
    }
}
