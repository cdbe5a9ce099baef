//! Retryability classifiers, one per failure domain.

use std::io;

use crate::error::{DocumentError, NetworkError, PersistenceError};

/// Windows `ERROR_SHARING_VIOLATION`.
const ERROR_SHARING_VIOLATION: i32 = 32;
/// Windows `ERROR_LOCK_VIOLATION`.
const ERROR_LOCK_VIOLATION: i32 = 33;

/// Network and HTTP failures.
///
/// DNS resolution failures are not retried immediately; a name that failed to
/// resolve will not resolve a second later. Other transport failures and
/// transient statuses (408, 429, 500, 502-504) are.
pub fn is_retryable_network(error: &NetworkError) -> bool {
    match error {
        NetworkError::Dns(_) => false,
        NetworkError::Timeout | NetworkError::Connect(_) | NetworkError::Transport(_) => true,
        NetworkError::Status(code) => matches!(code, 408 | 429 | 500 | 502 | 503 | 504),
        NetworkError::Decode(_) => false,
    }
}

/// File I/O failures.
///
/// Files in use by another process are retried; missing files and access
/// denials are not.
pub fn is_retryable_io(error: &io::Error) -> bool {
    if cfg!(windows)
        && let Some(code) = error.raw_os_error()
        && (code == ERROR_SHARING_VIOLATION || code == ERROR_LOCK_VIOLATION)
    {
        return true;
    }

    match error.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => false,
        io::ErrorKind::WouldBlock
        | io::ErrorKind::TimedOut
        | io::ErrorKind::Interrupted
        | io::ErrorKind::ResourceBusy => true,
        _ => {
            let message = error.to_string().to_ascii_lowercase();
            message.contains("used by another process") || message.contains("sharing violation")
        }
    }
}

/// Document loading failures.
pub fn is_retryable_document(error: &DocumentError) -> bool {
    match error {
        DocumentError::Locked => true,
        DocumentError::Io(e) => is_retryable_io(e),
        DocumentError::Malformed(_)
        | DocumentError::HyperlinkNotFound(_)
        | DocumentError::MissingContent(_) => false,
    }
}

/// Storage collaborator failures.
pub fn is_retryable_persistence(error: &PersistenceError) -> bool {
    match error {
        PersistenceError::Busy
        | PersistenceError::Locked
        | PersistenceError::Timeout
        | PersistenceError::Connection(_) => true,
        PersistenceError::Constraint(_) | PersistenceError::Corrupt(_) => false,
    }
}
