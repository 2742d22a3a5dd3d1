//! OpenAPI 3.0 document model and the multi-service generator
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

pub mod document;
pub mod generator;

pub use document::{
    Components, ExternalDocs, Info, MediaType, OAuthFlow, OAuthFlows, OpenApiDocument, Operation,
    Parameter, ParameterLocation, PathOperations, RequestBody, ResponseObject,
    SecurityRequirement, SecuritySchemeObject, Tag,
};
pub use generator::{generate_from_diagram, generate_specs};
