//! Line-oriented tokenizer for the sequence-diagram notation
//!
//! Produces at most one token per line. Lines that match no recognized
//! pattern are dropped silently; the strict syntax validator flags them
//! separately. The request arrow (`->>`) and response arrow (`-->>`) are
//! lexically distinct, so pattern order only matters for the comment
//! short-circuit.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use super::ast::HttpMethod;
use regex::Regex;
use std::sync::OnceLock;

/// A single recognized line of diagram source
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Participant {
        line: usize,
        name: String,
    },
    Request {
        line: usize,
        from: String,
        to: String,
        method: HttpMethod,
        path: String,
        summary: Option<String>,
    },
    Response {
        line: usize,
        from: String,
        to: String,
        status: String,
        description: Option<String>,
    },
    Note {
        line: usize,
        participants: Vec<String>,
        content: String,
        kind: NoteKind,
    },
}

impl Token {
    /// Source line this token was produced from (1-based)
    pub fn line(&self) -> usize {
        match self {
            Token::Participant { line, .. }
            | Token::Request { line, .. }
            | Token::Response { line, .. }
            | Token::Note { line, .. } => *line,
        }
    }
}

/// Whether a note carries a request body or plain annotation content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Body,
    Info,
}

// Participant names are word characters with interior dashes; a name never
// starts or ends with a dash, which keeps `A-->>B` from lexing as a request.
const NAME: &str = r"\w(?:[\w-]*\w)?";

pub(crate) fn request_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*({NAME})\s*->>\s*({NAME})\s*:\s*((?i:GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD))\s+(\S+)(?:\s+(.+))?\s*$"
        ))
        .expect("request pattern is valid")
    })
}

pub(crate) fn response_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*({NAME})\s*-->>\s*({NAME})\s*:\s*(\d{{3}})(?:\s+(.*))?$"
        ))
        .expect("response pattern is valid")
    })
}

pub(crate) fn participant_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*participant\s+({NAME})\s*$")).expect("participant pattern is valid")
    })
}

pub(crate) fn note_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*note\s+over\s+([^:]+?)\s*:\s*(.*)$").expect("note pattern is valid")
    })
}

/// Tokenize raw diagram text into an ordered token sequence.
///
/// One token per recognized non-blank, non-comment line; everything else is
/// dropped at this stage.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (index, raw_line) in input.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with("%%") {
            continue;
        }

        if let Some(caps) = request_re().captures(raw_line) {
            // The method alternation guarantees parse() succeeds here.
            if let Some(method) = HttpMethod::parse(&caps[3]) {
                tokens.push(Token::Request {
                    line,
                    from: caps[1].to_string(),
                    to: caps[2].to_string(),
                    method,
                    path: caps[4].to_string(),
                    summary: caps
                        .get(5)
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|s| !s.is_empty()),
                });
            }
            continue;
        }

        if let Some(caps) = response_re().captures(raw_line) {
            tokens.push(Token::Response {
                line,
                from: caps[1].to_string(),
                to: caps[2].to_string(),
                status: caps[3].to_string(),
                description: caps
                    .get(4)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|s| !s.is_empty()),
            });
            continue;
        }

        if let Some(caps) = participant_re().captures(raw_line) {
            tokens.push(Token::Participant {
                line,
                name: caps[1].to_string(),
            });
            continue;
        }

        if let Some(caps) = note_re().captures(raw_line) {
            let participants = caps[1]
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            let content = caps[2].trim().to_string();
            let kind = if content
                .get(..5)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("body:"))
            {
                NoteKind::Body
            } else {
                NoteKind::Info
            };
            tokens.push(Token::Note {
                line,
                participants,
                content,
                kind,
            });
        }
    }

    tokens
}
