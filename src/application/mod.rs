//! Application layer services implementing the validation and repair pipeline.
//!
//! Services consume the client traits from `crate::domain::clients` and the
//! retry/cache machinery from `crate::infrastructure`, and expose a plain
//! async API to the binary and to library callers.
//!
//! # Available Services
//!
//! - [`services::metadata_service::MetadataService`] - cached metadata lookup
//! - [`services::accessibility_service::AccessibilityChecker`] - reachability and expiration
//! - [`services::validation_service::HyperlinkValidator`] - single-link validation
//! - [`services::batch_runner::BatchRunner`] - bounded concurrent batches
//! - [`services::repair_service::RepairService`] - display-text repair with track changes

pub mod services;
