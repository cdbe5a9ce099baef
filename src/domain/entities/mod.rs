//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Hyperlink`] - A hyperlink submitted for validation
//! - [`ValidationResult`] - Outcome of validating one hyperlink
//! - [`TitleComparisonResult`] - Visible vs authoritative title comparison
//! - [`DocumentRecord`] - Authoritative metadata from the lookup service
//! - [`Document`] / [`HyperlinkElement`] - Hyperlink elements of an open document

pub mod document;
pub mod document_record;
pub mod hyperlink;
pub mod validation;

pub use document::{ContentNode, Document, HyperlinkElement, Revision, Run, RunProperties};
pub use document_record::DocumentRecord;
pub use hyperlink::Hyperlink;
pub use validation::{LinkStatus, TitleComparisonResult, ValidationResult};
