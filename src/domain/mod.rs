//! Domain layer containing entities and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (hyperlinks, results, records, documents)
//! - [`clients`] - Trait definitions for the network and lookup boundaries
//! - [`progress`] - Batch progress event model
//!
//! The domain layer has no dependencies on infrastructure; client traits are
//! implemented in `crate::infrastructure`.

pub mod clients;
pub mod entities;
pub mod progress;
