//! Parser: token sequence to [`Diagram`]
//!
//! Scans tokens in order with a single piece of mutable state: the most
//! recent interaction still waiting for its response. Responses pair only in
//! the strict reciprocal direction; everything that cannot pair or attach
//! becomes a diagnostic [`ParseNote`] instead of an error. Parsing never
//! fails.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use super::ast::{
    Diagram, Interaction, InteractionResponse, ParseNote, ParseNoteKind, SecurityDescriptor,
};
use super::token::{tokenize, NoteKind, Token};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

fn body_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*body:\s*(.+)$").expect("body pattern is valid"))
}

fn security_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)security:").expect("security pattern is valid"))
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(tags|operationid|description|docs|contenttype|content-type):\s*(.+)$")
            .expect("attribute pattern is valid")
    })
}

/// Parse raw diagram text into an AST
pub fn parse(input: &str) -> Diagram {
    parse_tokens(tokenize(input))
}

/// Parse an already-tokenized sequence into an AST
pub fn parse_tokens(tokens: Vec<Token>) -> Diagram {
    let mut diagram = Diagram::default();
    // Index into diagram.interactions of the request still awaiting a response
    let mut last_request: Option<usize> = None;

    for token in tokens {
        match token {
            Token::Participant { name, .. } => {
                diagram.participants.insert(name);
            }
            Token::Request {
                line,
                from,
                to,
                method,
                path,
                summary,
            } => {
                // Endpoints register even when never declared; strict
                // declaration checking belongs to the syntax validator.
                diagram.participants.insert(from.clone());
                diagram.participants.insert(to.clone());
                let mut interaction = Interaction::new(from, to, method, path, line);
                interaction.summary = summary;
                diagram.interactions.push(interaction);
                last_request = Some(diagram.interactions.len() - 1);
            }
            Token::Response {
                line,
                from,
                to,
                status,
                description,
            } => {
                let paired = last_request.and_then(|idx| {
                    let open = &diagram.interactions[idx];
                    (from == open.to && to == open.from).then_some(idx)
                });
                match paired {
                    Some(idx) => {
                        diagram.interactions[idx].response = Some(InteractionResponse {
                            status,
                            description,
                            line,
                        });
                        last_request = None;
                    }
                    None => {
                        warn!(line, from = %from, to = %to, "orphaned response");
                        diagram.notes.push(ParseNote {
                            kind: ParseNoteKind::OrphanedResponse,
                            line,
                            message: format!(
                                "Orphaned response '{from} -->> {to}: {status}' has no matching request"
                            ),
                        });
                    }
                }
            }
            Token::Note {
                line,
                participants,
                content,
                kind,
            } => {
                let target = last_request
                    .filter(|idx| participants.contains(&diagram.interactions[*idx].to));
                match target {
                    Some(idx) => {
                        apply_note(&mut diagram.interactions[idx], &content, kind, line, &mut diagram.notes);
                    }
                    None => {
                        diagram.notes.push(ParseNote {
                            kind: ParseNoteKind::OrphanedNote,
                            line,
                            message: format!("Note at line {line} does not attach to any open request"),
                        });
                    }
                }
            }
        }
    }

    diagram
}

/// Run the body, security, and attribute sub-grammars over attached note content
fn apply_note(
    interaction: &mut Interaction,
    content: &str,
    kind: NoteKind,
    line: usize,
    notes: &mut Vec<ParseNote>,
) {
    if kind == NoteKind::Body {
        if let Some(caps) = body_re().captures(content) {
            let raw = caps[1].trim();
            match serde_json::from_str(raw) {
                Ok(value) => interaction.body = Some(value),
                Err(err) => {
                    warn!(line, error = %err, "invalid JSON in body note");
                    notes.push(ParseNote {
                        kind: ParseNoteKind::InvalidBodyJson,
                        line,
                        message: format!("Invalid JSON in body note at line {line}: {raw}"),
                    });
                }
            }
        }
    }

    let descriptors = parse_security_descriptors(content);
    if !descriptors.is_empty() {
        interaction.security.extend(descriptors);
        return;
    }

    if kind == NoteKind::Info {
        apply_attributes(interaction, content);
    }
}

/// Extract every `Security: <descriptor>` occurrence, in encounter order.
/// Duplicates are kept; deduplication happens at generation time.
fn parse_security_descriptors(content: &str) -> Vec<SecurityDescriptor> {
    let marks: Vec<(usize, usize)> = security_marker_re()
        .find_iter(content)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut descriptors = Vec::new();
    for (i, (_, end)) in marks.iter().enumerate() {
        let until = marks.get(i + 1).map_or(content.len(), |(start, _)| *start);
        let raw = content[*end..until].trim().trim_end_matches(',').trim();
        if !raw.is_empty() {
            descriptors.push(SecurityDescriptor::parse(raw));
        }
    }
    descriptors
}

/// Info-note attribute grammar: `Tags:`, `OperationId:`, `Description:`,
/// `Docs:`, `ContentType:`, or the bare word `deprecated`. Unprefixed
/// content becomes the description when none is set yet.
fn apply_attributes(interaction: &mut Interaction, content: &str) {
    if content.trim().eq_ignore_ascii_case("deprecated") {
        interaction.deprecated = true;
        return;
    }

    if let Some(caps) = attribute_re().captures(content) {
        let value = caps[2].trim();
        match caps[1].to_ascii_lowercase().as_str() {
            "tags" => {
                interaction.tags = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "operationid" => interaction.operation_id = Some(value.to_string()),
            "description" => interaction.description = Some(value.to_string()),
            "docs" => interaction.external_docs_url = Some(value.to_string()),
            _ => interaction.request_media_type = Some(value.to_string()),
        }
        return;
    }

    if interaction.description.is_none() && !content.trim().is_empty() {
        interaction.description = Some(content.trim().to_string());
    }
}
