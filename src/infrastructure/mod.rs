//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - In-memory TTL cache with single-flight fetches
//! - [`retry`] - Retry policies, failure classifiers and the retry executor
//! - [`http`] - `reqwest` probe and lookup clients, plus offline test-mode clients
//! - [`document_store`] - JSON document session used by the command-line runner

pub mod cache;
pub mod document_store;
pub mod http;
pub mod retry;
