//! Schema inference from JSON body values
//!
//! String values are first tested against an explicit constraint
//! mini-language (`"string, required, min:3, format:email"`); everything
//! else is inferred from the runtime shape of the value. JSON values are
//! acyclic by construction, so the recursion needs no cycle detection.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use super::object::{SchemaObject, SchemaType};
use serde_json::{Map, Value};

/// Result of inferring one value: the schema plus whether the enclosing
/// object must list the property as required.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredSchema {
    pub schema: SchemaObject,
    pub required: bool,
}

impl InferredSchema {
    fn optional(schema: SchemaObject) -> Self {
        Self {
            schema,
            required: false,
        }
    }
}

/// Parsed form of the constraint mini-language.
///
/// A string qualifies iff its first comma-separated token is a recognized
/// type name, any token is exactly `required`, or any token contains `:`.
#[derive(Debug, Default)]
struct ConstraintSpec {
    schema_type: Option<SchemaType>,
    required: bool,
    min: Option<f64>,
    max: Option<f64>,
    format: Option<String>,
    example: Option<String>,
}

impl ConstraintSpec {
    fn parse(input: &str) -> Option<Self> {
        let tokens: Vec<&str> = input.split(',').map(str::trim).collect();
        let first_is_type = tokens
            .first()
            .and_then(|t| SchemaType::parse(t))
            .is_some();
        let qualifies = first_is_type
            || tokens.iter().any(|t| *t == "required")
            || tokens.iter().any(|t| t.contains(':'));
        if !qualifies {
            return None;
        }

        let mut spec = ConstraintSpec::default();
        for (i, token) in tokens.iter().enumerate() {
            if i == 0 {
                if let Some(schema_type) = SchemaType::parse(token) {
                    spec.schema_type = Some(schema_type);
                    continue;
                }
            }
            if *token == "required" {
                spec.required = true;
                continue;
            }
            if let Some((key, value)) = token.split_once(':') {
                let value = value.trim();
                match key.trim().to_ascii_lowercase().as_str() {
                    "min" => spec.min = value.parse().ok(),
                    "max" => spec.max = value.parse().ok(),
                    "format" => spec.format = Some(value.to_string()),
                    "example" => spec.example = Some(value.to_string()),
                    // Unknown keys are ignored, not rejected.
                    _ => {}
                }
            }
        }
        Some(spec)
    }

    fn into_inferred(self) -> InferredSchema {
        let schema_type = self.schema_type.unwrap_or(SchemaType::String);
        let mut schema = SchemaObject {
            schema_type: Some(schema_type),
            format: self.format,
            ..Default::default()
        };
        // Numeric bounds mean length for strings and value range otherwise.
        if schema_type == SchemaType::String {
            schema.min_length = self.min.map(|m| m as u64);
            schema.max_length = self.max.map(|m| m as u64);
        } else {
            schema.minimum = self.min;
            schema.maximum = self.max;
        }
        if let Some(example) = self.example {
            schema.example = Some(Value::String(example));
        }
        InferredSchema {
            schema,
            required: self.required,
        }
    }
}

/// Infer the schema for a single JSON value.
///
/// Always terminates and always yields one of the six defined schema types.
pub fn infer_value(value: &Value) -> InferredSchema {
    match value {
        Value::String(text) => match ConstraintSpec::parse(text) {
            Some(spec) => spec.into_inferred(),
            None => InferredSchema::optional(SchemaObject::string().with_example(value.clone())),
        },
        Value::Null => InferredSchema::optional(SchemaObject::string()),
        Value::Bool(_) => {
            InferredSchema::optional(SchemaObject::boolean().with_example(value.clone()))
        }
        Value::Number(number) => {
            let integral = number.as_i64().is_some()
                || number.as_u64().is_some()
                || number.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0);
            let schema = if integral {
                SchemaObject::integer()
            } else {
                SchemaObject::number()
            };
            InferredSchema::optional(schema.with_example(value.clone()))
        }
        Value::Array(elements) => {
            let items = match elements.first() {
                Some(Value::Object(map)) => generate_object(map),
                Some(first) => infer_value(first).schema,
                None => SchemaObject::string(),
            };
            InferredSchema::optional(SchemaObject::array(items))
        }
        Value::Object(map) => InferredSchema::optional(generate_object(map)),
    }
}

/// Build an object schema from a JSON object, one property per key in
/// source order. Nested non-array objects recurse here directly; all other
/// values go through [`infer_value`]. The `required` list is omitted when
/// empty.
pub fn generate_object(object: &Map<String, Value>) -> SchemaObject {
    let mut schema = SchemaObject::object();
    let mut required = Vec::new();

    for (key, value) in object {
        match value {
            Value::Object(nested) => {
                schema.properties.insert(key.clone(), generate_object(nested));
            }
            _ => {
                let inferred = infer_value(value);
                if inferred.required {
                    required.push(key.clone());
                }
                schema.properties.insert(key.clone(), inferred.schema);
            }
        }
    }

    schema.required = required;
    schema
}
