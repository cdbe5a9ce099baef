//! Progress events emitted while a batch is validated.

use crate::domain::entities::LinkStatus;

/// Notification that one hyperlink in a batch finished validating.
///
/// Sent over a `tokio::sync::mpsc` channel supplied by the caller, which
/// decouples progress reporting from the validation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationProgress {
    pub hyperlink_id: String,
    pub status: LinkStatus,
    /// Number of hyperlinks finished so far, including this one.
    pub completed: usize,
    pub total: usize,
}

impl ValidationProgress {
    pub fn new(hyperlink_id: String, status: LinkStatus, completed: usize, total: usize) -> Self {
        Self {
            hyperlink_id,
            status,
            completed,
            total,
        }
    }

    pub fn is_last(&self) -> bool {
        self.completed == self.total
    }
}
