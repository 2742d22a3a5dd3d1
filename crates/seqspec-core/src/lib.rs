//! Seqspec Core - sequence-diagram to OpenAPI conversion and validation
//!
//! This crate converts a textual sequence-diagram notation describing HTTP
//! interactions into one OpenAPI 3.0 document per target service, and
//! independently validates both the source notation and the generated (or
//! any supplied) documents.
//!
//! # Main Components
//!
//! - **Diagram front end**: tokenizer and pairing parser producing the AST
//! - **Schema Inference**: JSON body values to OpenAPI schema objects
//! - **Spec Generator**: per-service documents with schema deduplication
//! - **Validators**: strict notation diagnostics and structural document
//!   checks, both reporting through [`ValidationResult`]
//!
//! # Example
//!
//! ```
//! use seqspec_core::{generate_specs, validate_syntax};
//!
//! let input = "participant User\n\
//!              participant API\n\
//!              User->>API: GET /users\n\
//!              API-->>User: 200 OK";
//!
//! assert!(validate_syntax(input).valid);
//! let documents = generate_specs(input);
//! assert!(documents.contains_key("API"));
//! ```
//!
//! Everything is synchronous and allocation-local: each call builds its own
//! working state and returns a fully formed result, so independent inputs
//! can be processed concurrently without coordination.

pub mod diagram;
pub mod error;
pub mod openapi;
pub mod schema;
pub mod validation;

// Re-export main types for convenience
pub use error::{Error, Result};

pub use diagram::{
    parse, tokenize,
    Diagram, HttpMethod, Interaction, InteractionResponse, NoteKind, ParseNote, ParseNoteKind,
    SecurityDescriptor, Token,
};
pub use openapi::{
    generate_from_diagram, generate_specs,
    Components, OpenApiDocument, Operation, Parameter, ParameterLocation, RequestBody,
    ResponseObject, SecuritySchemeObject, Tag,
};
pub use schema::{generate_object, infer_value, InferredSchema, SchemaObject, SchemaType};
pub use validation::{
    validate_document, validate_documents, validate_generated, validate_syntax,
    IssueSource, Severity, ValidationIssue, ValidationResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_facade_round_trip() {
        let input = "participant User\nparticipant API\nUser->>API: GET /users\nAPI-->>User: 200 OK";
        let documents = generate_specs(input);
        let result = validate_generated(&documents);
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }
}
