//! Sequence-diagram notation front end
//!
//! This module turns raw diagram text into an abstract syntax tree in two
//! stages: a line-oriented tokenizer and a pairing parser. Both stages are
//! lenient by design; strict diagnostics are the job of
//! [`crate::validation::syntax`].
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod parser;
pub mod token;

pub use ast::{
    ApiKeyLocation, Diagram, HttpMethod, Interaction, InteractionResponse, ParseNote,
    ParseNoteKind, SecurityDescriptor,
};
pub use parser::{parse, parse_tokens};
pub use token::{tokenize, NoteKind, Token};
