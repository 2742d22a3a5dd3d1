//! Diagnostic record types shared by both validators
//!
//! This is the sole contract any presentation layer consumes: a flat result
//! with `valid` reflecting errors only, plus the error and warning lists.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which layer produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSource {
    /// The sequence-diagram notation
    Mermaid,
    /// A generated or supplied OpenAPI document
    Openapi,
}

/// Diagnostic severity; only errors affect validity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub source: IssueSource,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ValidationIssue {
    pub fn error(source: IssueSource, message: impl Into<String>) -> Self {
        Self::new(source, Severity::Error, message)
    }

    pub fn warning(source: IssueSource, message: impl Into<String>) -> Self {
        Self::new(source, Severity::Warning, message)
    }

    fn new(source: IssueSource, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            source,
            severity,
            line: None,
            message: message.into(),
            suggestion: None,
            context: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Prefix the context with a service name, keeping any existing context
    pub fn prefixed(mut self, prefix: &str) -> Self {
        self.context = Some(match self.context.take() {
            Some(existing) => format!("{prefix}: {existing}"),
            None => prefix.to_string(),
        });
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Aggregated validation outcome; `valid` is true iff `errors` is empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Partition issues by severity; warnings and infos never affect validity
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for issue in issues {
            match issue.severity {
                Severity::Error => errors.push(issue),
                Severity::Warning | Severity::Info => warnings.push(issue),
            }
        }
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Merge another result into this one, recomputing validity
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.valid = self.errors.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_tracks_errors_only() {
        let result = ValidationResult::from_issues(vec![
            ValidationIssue::warning(IssueSource::Mermaid, "odd but fine"),
        ]);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);

        let result = ValidationResult::from_issues(vec![
            ValidationIssue::error(IssueSource::Openapi, "broken"),
        ]);
        assert!(!result.valid);
    }

    #[test]
    fn test_wire_shape() {
        let issue = ValidationIssue::error(IssueSource::Mermaid, "Invalid HTTP method")
            .with_line(3)
            .with_suggestion("Valid methods are: GET, POST");
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["source"], "mermaid");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["line"], 3);
        assert!(value.get("context").is_none());
    }

    #[test]
    fn test_context_prefixing() {
        let issue = ValidationIssue::error(IssueSource::Openapi, "x").with_context("paths./users");
        let issue = issue.prefixed("orders");
        assert_eq!(issue.context.as_deref(), Some("orders: paths./users"));

        let bare = ValidationIssue::error(IssueSource::Openapi, "x").prefixed("orders");
        assert_eq!(bare.context.as_deref(), Some("orders"));
    }

    #[test]
    fn test_merge_recomputes_validity() {
        let mut left = ValidationResult::from_issues(vec![]);
        assert!(left.valid);
        left.merge(ValidationResult::from_issues(vec![ValidationIssue::error(
            IssueSource::Openapi,
            "late failure",
        )]));
        assert!(!left.valid);
    }
}
