//! Error taxonomy shared by the pipeline.
//!
//! Each failure domain owns its own error type so retry policies can classify
//! failures by variant instead of by message:
//!
//! - [`NetworkError`] - reachability probes, content fetches and metadata lookups
//! - [`DocumentError`] - document loading and hyperlink mutation
//! - [`PersistenceError`] - storage collaborators (session/metrics history)
//! - [`RetryError`] - outcome of an operation executed under a retry policy
//! - [`Cancelled`] - cooperative cancellation signal

use std::error::Error as StdError;
use std::io;

/// Failures crossing the network boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Self::Status(status.as_u16());
        }
        if e.is_timeout() {
            return Self::Timeout;
        }
        if e.is_decode() {
            return Self::Decode(e.to_string());
        }

        let chain = error_chain(&e);
        if is_dns_failure(&chain) {
            return Self::Dns(chain);
        }
        if e.is_connect() {
            return Self::Connect(chain);
        }

        Self::Transport(chain)
    }
}

/// Flattens an error and its sources into one message.
fn error_chain(e: &dyn StdError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

fn is_dns_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
}

/// Failures while loading, saving or mutating a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Document is locked by another writer")]
    Locked,

    #[error("Hyperlink '{0}' not found in document")]
    HyperlinkNotFound(String),

    #[error("Hyperlink '{0}' has no content root")]
    MissingContent(String),
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            return Self::Io(io::Error::other(e.to_string()));
        }
        Self::Malformed(e.to_string())
    }
}

/// Failures reported by storage collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage is busy")]
    Busy,

    #[error("Storage is locked")]
    Locked,

    #[error("Storage operation timed out")]
    Timeout,

    #[error("Storage connection failed: {0}")]
    Connection(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Storage is corrupt: {0}")]
    Corrupt(String),
}

/// Cooperative cancellation was requested before the work finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Operation cancelled")]
pub struct Cancelled;

/// Outcome of an operation that failed under a retry policy.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E>
where
    E: StdError + 'static,
{
    /// The policy classified the failure as non-retryable.
    #[error(transparent)]
    Operation(E),

    #[error("{policy}: retries exhausted after {attempts} attempts: {source}")]
    Exhausted {
        policy: String,
        attempts: u32,
        #[source]
        source: E,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl<E> RetryError<E>
where
    E: StdError + 'static,
{
    /// Returns the underlying failure, if the operation ran at all.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Operation(e) | Self::Exhausted { source: e, .. } => Some(e),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
