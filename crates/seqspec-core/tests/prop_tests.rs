//! Property-based tests for the inference engine and the syntax validator
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use proptest::prelude::*;
use seqspec_core::{generate_object, infer_value, validate_syntax, SchemaType};
use serde_json::{Map, Value};

/// Strings that the constraint mini-language would claim for itself; leaf
/// strings below avoid `,` and `:`, so only these exact tokens qualify.
const RESERVED: [&str; 7] = [
    "string", "integer", "number", "boolean", "array", "object", "required",
];

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000).prop_map(|n| Value::from(n)),
        (-1_000_000.0f64..1_000_000.0)
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(|f| Value::from(f)),
        "[a-zA-Z ]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            arb_object_from(inner),
        ]
    })
}

fn arb_object_from(inner: impl Strategy<Value = Value> + Clone) -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,8}", inner), 0..4).prop_map(|entries| {
        let mut map = Map::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        Value::Object(map)
    })
}

fn arb_object() -> impl Strategy<Value = Map<String, Value>> {
    arb_object_from(arb_json().boxed()).prop_map(|value| match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    })
}

/// Replace every leaf with a different value of the same shape. Reserved
/// constraint tokens are kept verbatim so the schema semantics stay fixed.
fn reshape(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(!b),
        Value::Number(n) => {
            if n.as_i64().is_some() || n.as_u64().is_some() {
                Value::from(n.as_i64().unwrap_or(0).wrapping_add(7))
            } else if n.as_f64().is_some_and(|f| f.fract() == 0.0) {
                Value::from(7.0)
            } else {
                Value::from(2.5)
            }
        }
        Value::String(s) => {
            if RESERVED.contains(&s.trim()) {
                Value::String(s.clone())
            } else {
                Value::String(format!("{s}x"))
            }
        }
        Value::Array(items) => Value::Array(items.iter().map(reshape).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), reshape(v)))
                .collect(),
        ),
    }
}

const ALL_TYPES: [SchemaType; 6] = [
    SchemaType::String,
    SchemaType::Integer,
    SchemaType::Number,
    SchemaType::Boolean,
    SchemaType::Array,
    SchemaType::Object,
];

proptest! {
    #[test]
    fn inference_always_yields_a_defined_type(value in arb_json()) {
        let inferred = infer_value(&value);
        let schema_type = inferred.schema.schema_type.expect("inference always sets a type");
        prop_assert!(ALL_TYPES.contains(&schema_type));
    }

    #[test]
    fn generated_object_preserves_key_set(object in arb_object()) {
        let schema = generate_object(&object);
        prop_assert_eq!(schema.properties.len(), object.len());
        let schema_keys: Vec<&String> = schema.properties.keys().collect();
        let source_keys: Vec<&String> = object.keys().collect();
        prop_assert_eq!(schema_keys, source_keys);
    }

    #[test]
    fn generated_object_is_idempotent(object in arb_object()) {
        let first = serde_json::to_string(&generate_object(&object)).unwrap();
        let second = serde_json::to_string(&generate_object(&object)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn fingerprint_depends_only_on_shape(object in arb_object()) {
        let reshaped = match reshape(&Value::Object(object.clone())) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        prop_assert_eq!(
            generate_object(&object).fingerprint(),
            generate_object(&reshaped).fingerprint()
        );
    }

    #[test]
    fn whitespace_only_input_is_an_empty_input_error(input in "[ \t\r\n]{0,24}") {
        let result = validate_syntax(&input);
        prop_assert!(!result.valid);
        prop_assert_eq!(result.errors.len(), 1);
        prop_assert_eq!(result.errors[0].message.as_str(), "Empty input");
    }
}
