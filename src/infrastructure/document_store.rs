//! JSON-backed document session.
//!
//! Loads a [`Document`] into memory and writes it back. The pipeline mutates
//! the loaded document through `&mut` only; this store is the single owner of
//! the file on disk.

use std::io;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::entities::Document;
use crate::error::{DocumentError, RetryError};
use crate::infrastructure::retry::{RetryExecutor, RetryPolicy};

/// Loads and saves documents stored as JSON files.
///
/// A sibling `<file>.lock` marks the document as held by another writer;
/// loading waits for it to disappear under the document-format policy.
#[derive(Clone)]
pub struct JsonDocumentStore {
    retry: RetryExecutor,
    document_policy: RetryPolicy<DocumentError>,
    file_policy: RetryPolicy<io::Error>,
}

impl JsonDocumentStore {
    pub fn new(retry: RetryExecutor) -> Self {
        Self {
            retry,
            document_policy: RetryPolicy::document_format(),
            file_policy: RetryPolicy::file_io(),
        }
    }

    pub fn with_policies(
        retry: RetryExecutor,
        document_policy: RetryPolicy<DocumentError>,
        file_policy: RetryPolicy<io::Error>,
    ) -> Self {
        Self {
            retry,
            document_policy,
            file_policy,
        }
    }

    /// Reads and parses a document.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::Locked`] (after retries) if a lock file is present
    /// - [`DocumentError::Io`] if the file cannot be read
    /// - [`DocumentError::Malformed`] if the file is not a valid document
    pub async fn load(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Document, RetryError<DocumentError>> {
        let document = self
            .retry
            .execute(&self.document_policy, cancel, move || read_document(path))
            .await?;

        info!(
            path = %path.display(),
            hyperlinks = document.hyperlinks.len(),
            "Document loaded"
        );
        Ok(document)
    }

    /// Serializes and writes a document.
    ///
    /// # Errors
    ///
    /// Returns the final I/O error if the file cannot be written.
    pub async fn save(
        &self,
        path: &Path,
        document: &Document,
        cancel: &CancellationToken,
    ) -> Result<(), RetryError<io::Error>> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| RetryError::Operation(io::Error::other(e)))?;

        let bytes = json.as_bytes();
        self.retry
            .execute(&self.file_policy, cancel, move || tokio::fs::write(path, bytes))
            .await?;

        info!(path = %path.display(), "Document saved");
        Ok(())
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

async fn read_document(path: &Path) -> Result<Document, DocumentError> {
    if tokio::fs::try_exists(lock_path(path)).await? {
        debug!(path = %path.display(), "Document is locked");
        return Err(DocumentError::Locked);
    }

    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
