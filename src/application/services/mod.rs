//! Pipeline services for the application layer.

pub mod accessibility_service;
pub mod batch_runner;
pub mod metadata_service;
pub mod repair_service;
pub mod validation_service;

pub use accessibility_service::{AccessibilityChecker, AccessibilityReport};
pub use batch_runner::{BatchRunner, DEFAULT_MAX_CONCURRENCY};
pub use metadata_service::MetadataService;
pub use repair_service::{RepairService, TrackedEdit, update_display_text};
pub use validation_service::HyperlinkValidator;
