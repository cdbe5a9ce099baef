//! Retry/backoff engine.
//!
//! - [`RetryPolicy`] - immutable per-domain policy (limits, backoff, predicate)
//! - [`RetryExecutor`] - runs an operation under a policy with cancellation
//! - [`classify`] - built-in retryability tables for network, file I/O,
//!   document-format and persistence failures

pub mod classify;
mod executor;
mod policy;

pub use classify::{
    is_retryable_document, is_retryable_io, is_retryable_network, is_retryable_persistence,
};
pub use executor::{RetryContext, RetryExecutor, RetryObserver};
pub use policy::{BackoffType, RetryPolicy};
