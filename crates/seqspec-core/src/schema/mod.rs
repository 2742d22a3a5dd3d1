//! Schema model and inference engine
//!
//! [`object`] defines the recursive OpenAPI schema structure and its
//! structural fingerprint; [`infer`] converts JSON-like body values into
//! schemas, honoring the explicit constraint mini-language.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

pub mod infer;
pub mod object;

pub use infer::{generate_object, infer_value, InferredSchema};
pub use object::{SchemaObject, SchemaType};
