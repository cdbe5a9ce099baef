//! Pure helper functions used across the pipeline.
//!
//! - [`lookup_id`] - Lookup identifier extraction from hyperlink URLs
//! - [`title`] - Display-text title derivation and comparison
//! - [`content_id`] - Content id derivation and padding

pub mod content_id;
pub mod lookup_id;
pub mod title;
