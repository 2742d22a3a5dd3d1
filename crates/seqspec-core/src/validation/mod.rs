//! Diagnostics and the two validators
//!
//! [`issue`] defines the diagnostic contract shared by both validators;
//! [`syntax`] checks raw diagram text strictly, and [`document`] checks
//! generated or externally supplied OpenAPI documents.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

pub mod document;
pub mod issue;
pub mod syntax;

pub use document::{validate_document, validate_documents, validate_generated};
pub use issue::{IssueSource, Severity, ValidationIssue, ValidationResult};
pub use syntax::validate_syntax;
