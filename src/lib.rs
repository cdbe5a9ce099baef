//! # Link Repair
//!
//! Validates hyperlinks embedded in documents against a metadata lookup
//! service and their live targets, and repairs stale display text.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, client traits and progress events
//! - **Application Layer** ([`application`]) - Validation, batching and repair services
//! - **Infrastructure Layer** ([`infrastructure`]) - Retry engine, cache, HTTP clients, document store
//! - **Utilities** ([`utils`]) - Identifier extraction, title comparison, content ids
//!
//! ## Features
//!
//! - Lookup id extraction from structured paths and `docid=` parameters
//! - Per-domain retry policies with backoff, jitter and cancellation
//! - TTL caching with at most one outstanding lookup per id
//! - Reachability, not-found and expiration classification
//! - Bounded concurrent batch validation with progress events
//! - Display text repair, optionally as tracked changes
//!
//! ## Quick Start
//!
//! ```bash
//! export LOOKUP_API_URL="https://lookup.example.com/api/lookup"
//! export LOOKUP_API_KEY="..."        # Optional
//!
//! cargo run -- validate document.json
//! cargo run -- repair document.json --track-changes
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;

pub use error::{DocumentError, NetworkError, RetryError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AccessibilityChecker, BatchRunner, HyperlinkValidator, MetadataService, RepairService,
    };
    pub use crate::domain::entities::{
        Document, Hyperlink, HyperlinkElement, LinkStatus, ValidationResult,
    };
    pub use crate::domain::progress::ValidationProgress;
    pub use crate::error::{DocumentError, NetworkError, RetryError};
    pub use crate::state::AppState;
}
