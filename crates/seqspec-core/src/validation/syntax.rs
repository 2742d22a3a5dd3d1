//! Strict syntax validation of raw diagram text
//!
//! Re-analyzes the source line by line, independently of the lenient
//! tokenizer, so malformations the tokenizer silently drops still surface
//! here. Per-line checks run first; a cross-reference pass over the token
//! stream then checks declarations, pairing, and note attachment.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use super::issue::{IssueSource, ValidationIssue, ValidationResult};
use crate::diagram::ast::HttpMethod;
use crate::diagram::token::{note_re, tokenize, NoteKind, Token};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn name_ok_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w-]+$").expect("name pattern is valid"))
}

fn strict_participant_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*participant\s+(.+?)\s*$").expect("participant pattern is valid"))
}

fn loose_request_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Any method token is accepted here so invalid methods can be
        // diagnosed instead of falling through to the generic warning.
        Regex::new(r"^\s*(\S+?)\s*->>\s*(\S+?)\s*:\s*(\S+)(?:\s+(\S+)(?:\s+(.*))?)?\s*$")
            .expect("request pattern is valid")
    })
}

fn strict_response_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\S+?)\s*-->>\s*(\S+?)\s*:\s*(\d{3})(?:\s+(.*))?$")
            .expect("response pattern is valid")
    })
}

fn body_content_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*body:\s*(.*)$").expect("body pattern is valid"))
}

fn valid_methods() -> String {
    HttpMethod::ALL
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate raw diagram text, returning all findings at once
pub fn validate_syntax(input: &str) -> ValidationResult {
    if input.trim().is_empty() {
        return ValidationResult::from_issues(vec![ValidationIssue::error(
            IssueSource::Mermaid,
            "Empty input",
        )]);
    }

    let mut issues = Vec::new();
    for (index, raw_line) in input.lines().enumerate() {
        check_line(index + 1, raw_line, &mut issues);
    }
    cross_reference(input, &mut issues);

    ValidationResult::from_issues(issues)
}

fn check_line(line: usize, raw_line: &str, issues: &mut Vec<ValidationIssue>) {
    let trimmed = raw_line.trim();
    if trimmed.is_empty() || trimmed.starts_with("%%") {
        return;
    }

    if let Some(caps) = strict_participant_re().captures(raw_line) {
        check_name(&caps[1], line, issues);
        return;
    }

    // The response arrow embeds the request arrow, so test it first.
    if trimmed.contains("-->>") {
        if let Some(caps) = strict_response_re().captures(raw_line) {
            check_name(&caps[1], line, issues);
            check_name(&caps[2], line, issues);
        } else {
            // Covers missing or non-numeric status codes.
            push_unmatched(line, trimmed, issues);
        }
        return;
    }

    if trimmed.contains("->>") {
        if let Some(caps) = loose_request_re().captures(raw_line) {
            check_name(&caps[1], line, issues);
            check_name(&caps[2], line, issues);
            let method = &caps[3];
            if HttpMethod::parse(method).is_none() {
                issues.push(
                    ValidationIssue::error(
                        IssueSource::Mermaid,
                        format!("Invalid HTTP method: '{method}'"),
                    )
                    .with_line(line)
                    .with_suggestion(format!("Valid methods are: {}", valid_methods())),
                );
            }
            match caps.get(4) {
                Some(path) => check_path(path.as_str(), line, issues),
                None => push_unmatched(line, trimmed, issues),
            }
        } else {
            push_unmatched(line, trimmed, issues);
        }
        return;
    }

    if note_re().is_match(raw_line) {
        // Note contents are checked in the cross-reference pass.
        return;
    }

    push_unmatched(line, trimmed, issues);
}

fn push_unmatched(line: usize, trimmed: &str, issues: &mut Vec<ValidationIssue>) {
    issues.push(
        ValidationIssue::warning(IssueSource::Mermaid, "Line does not match any known pattern")
            .with_line(line)
            .with_context(trimmed.to_string()),
    );
}

fn check_name(name: &str, line: usize, issues: &mut Vec<ValidationIssue>) {
    if !name_ok_re().is_match(name) {
        issues.push(
            ValidationIssue::error(
                IssueSource::Mermaid,
                format!("Invalid participant name: '{name}'"),
            )
            .with_line(line)
            .with_suggestion("Participant names may contain letters, digits, '_' and '-'"),
        );
    } else if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        issues.push(
            ValidationIssue::warning(
                IssueSource::Mermaid,
                format!("Participant name '{name}' starts with a digit"),
            )
            .with_line(line),
        );
    }
}

fn check_path(path: &str, line: usize, issues: &mut Vec<ValidationIssue>) {
    let mut push_error = |message: String| {
        issues.push(ValidationIssue::error(IssueSource::Mermaid, message).with_line(line));
    };

    if path.contains("{{") {
        push_error(format!("Invalid path '{path}': doubled braces"));
        return;
    }
    if path.contains("}{") {
        push_error(format!("Invalid path '{path}': adjacent parameter groups"));
        return;
    }

    let mut depth = 0usize;
    for ch in path.chars() {
        match ch {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    push_error(format!("Invalid path '{path}': unmatched '}}'"));
                    return;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        push_error(format!("Invalid path '{path}': unmatched '{{'"));
    }
}

/// Token-level pass: declarations, reciprocal pairing, note attachment
fn cross_reference(input: &str, issues: &mut Vec<ValidationIssue>) {
    let tokens = tokenize(input);

    let declared: HashSet<&str> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Participant { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();

    let mut reported_unknown: HashSet<String> = HashSet::new();
    let mut check_declared = |name: &str, line: usize, issues: &mut Vec<ValidationIssue>| {
        if !declared.contains(name) && reported_unknown.insert(name.to_string()) {
            issues.push(
                ValidationIssue::error(
                    IssueSource::Mermaid,
                    format!("Unknown participant '{name}'"),
                )
                .with_line(line)
                .with_suggestion(format!("Declare it with 'participant {name}'")),
            );
        }
    };

    let mut last_request: Option<(&str, &str)> = None;
    let mut seen_request = false;

    for token in &tokens {
        match token {
            Token::Participant { .. } => {}
            Token::Request { line, from, to, .. } => {
                check_declared(from, *line, issues);
                check_declared(to, *line, issues);
                seen_request = true;
                last_request = Some((from.as_str(), to.as_str()));
            }
            Token::Response { line, from, to, .. } => {
                check_declared(from, *line, issues);
                check_declared(to, *line, issues);
                let paired = last_request
                    .is_some_and(|(req_from, req_to)| from == req_to && to == req_from);
                if paired {
                    last_request = None;
                } else {
                    issues.push(
                        ValidationIssue::error(
                            IssueSource::Mermaid,
                            format!("Orphaned response: no matching request for '{from} -->> {to}'"),
                        )
                        .with_line(*line),
                    );
                }
            }
            Token::Note {
                line,
                participants,
                content,
                kind,
            } => {
                for participant in participants {
                    if !declared.contains(participant.as_str()) {
                        issues.push(
                            ValidationIssue::warning(
                                IssueSource::Mermaid,
                                format!("Note references undeclared participant '{participant}'"),
                            )
                            .with_line(*line),
                        );
                    }
                }
                if !seen_request {
                    issues.push(
                        ValidationIssue::warning(
                            IssueSource::Mermaid,
                            "Orphaned note: appears before any request",
                        )
                        .with_line(*line),
                    );
                }
                if *kind == NoteKind::Body {
                    check_body_note(content, *line, issues);
                }
            }
        }
    }
}

fn check_body_note(content: &str, line: usize, issues: &mut Vec<ValidationIssue>) {
    let raw = body_content_re()
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();
    if serde_json::from_str::<serde_json::Value>(&raw).is_err() {
        issues.push(
            ValidationIssue::error(
                IssueSource::Mermaid,
                format!("Invalid JSON in body note: {raw}"),
            )
            .with_line(line),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        for input in ["", "   ", "\n\t \n"] {
            let result = validate_syntax(input);
            assert!(!result.valid);
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].message, "Empty input");
        }
    }

    #[test]
    fn test_clean_diagram_is_valid() {
        let input = "participant User\nparticipant API\nUser->>API: GET /users\nAPI-->>User: 200 OK";
        let result = validate_syntax(input);
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_invalid_http_method() {
        let result = validate_syntax("User->>API: INVALID /users");
        assert!(!result.valid);
        let error = result
            .errors
            .iter()
            .find(|e| e.message.contains("Invalid HTTP method"))
            .expect("invalid-method error");
        assert!(error.suggestion.as_ref().unwrap().contains("GET"));
        assert!(error.suggestion.as_ref().unwrap().contains("HEAD"));
    }

    #[test]
    fn test_orphaned_response() {
        let result = validate_syntax("API-->>User: 200 OK");
        assert!(result.errors.iter().any(|e| e.message.contains("Orphaned response")));
    }

    #[test]
    fn test_same_direction_response_is_orphaned() {
        let input = "participant User\nparticipant API\nUser->>API: GET /users\nUser-->>API: 200 OK";
        let result = validate_syntax(input);
        assert!(result.errors.iter().any(|e| e.message.contains("Orphaned response")));
    }

    #[test]
    fn test_invalid_body_json() {
        let input = "participant User\nparticipant API\nUser->>API: POST /users\nNote over User,API: Body: { \"name\": \"John\", }";
        let result = validate_syntax(input);
        let error = result
            .errors
            .iter()
            .find(|e| e.message.contains("Invalid JSON"))
            .expect("invalid-json error");
        assert!(error.message.contains("{ \"name\": \"John\", }"));
    }

    #[test]
    fn test_undeclared_participant() {
        let result = validate_syntax("User->>API: GET /users");
        let unknown: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.message.contains("Unknown participant"))
            .collect();
        assert_eq!(unknown.len(), 2);
        assert!(unknown[0]
            .suggestion
            .as_ref()
            .unwrap()
            .contains("participant User"));
    }

    #[test]
    fn test_undeclared_participant_reported_once() {
        let input = "User->>API: GET /a\nAPI-->>User: 200 OK\nUser->>API: GET /b";
        let result = validate_syntax(input);
        let unknown: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.message.contains("Unknown participant"))
            .collect();
        assert_eq!(unknown.len(), 2);
    }

    #[test]
    fn test_path_brace_errors() {
        let doubled = validate_syntax("participant A\nparticipant B\nA->>B: GET /users/{{id}}");
        assert!(doubled.errors.iter().any(|e| e.message.contains("doubled braces")));

        let unmatched = validate_syntax("participant A\nparticipant B\nA->>B: GET /users/{id");
        assert!(unmatched.errors.iter().any(|e| e.message.contains("unmatched '{'")));

        let closing = validate_syntax("participant A\nparticipant B\nA->>B: GET /users/id}");
        assert!(closing.errors.iter().any(|e| e.message.contains("unmatched '}'")));

        let adjacent = validate_syntax("participant A\nparticipant B\nA->>B: GET /users/{a}{b}");
        assert!(adjacent.errors.iter().any(|e| e.message.contains("adjacent parameter groups")));
    }

    #[test]
    fn test_multi_segment_parameters_are_valid() {
        let input = "participant A\nparticipant B\nA->>B: GET /users/{uid}/orders/{oid}";
        let result = validate_syntax(input);
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_unrecognized_line_warns_but_stays_valid() {
        let input = "participant A\nparticipant B\nA->>B: GET /x\nB-->>A: 200 OK\nthis is nonsense";
        let result = validate_syntax(input);
        assert!(result.valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("does not match")));
    }

    #[test]
    fn test_non_numeric_status_falls_through_to_generic_warning() {
        let input = "participant A\nparticipant B\nA->>B: GET /x\nB-->>A: OK";
        let result = validate_syntax(input);
        assert!(result.valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("does not match")));
    }

    #[test]
    fn test_digit_leading_name_warns() {
        let result = validate_syntax("participant 9track\n9track->>9track: GET /x");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("starts with a digit")));
    }

    #[test]
    fn test_note_before_request_warns() {
        let input = "participant A\nNote over A: waiting";
        let result = validate_syntax(input);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("Orphaned note")));
    }

    #[test]
    fn test_note_with_undeclared_participant_warns() {
        let input = "participant A\nparticipant B\nA->>B: GET /x\nNote over Ghost: hmm";
        let result = validate_syntax(input);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("undeclared participant 'Ghost'")));
    }
}
