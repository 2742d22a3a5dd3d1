//! Structural validation of OpenAPI documents
//!
//! Operates on `serde_json::Value` so externally supplied documents are
//! checked exactly like generated ones. Covers required fields, response
//! and content shapes, parameter locations, `$ref` integrity, and circular
//! reference detection; multi-document mode adds cross-service checks.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use super::issue::{IssueSource, ValidationIssue, ValidationResult};
use crate::openapi::OpenApiDocument;
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use std::collections::HashSet;

const METHODS: [&str; 7] = ["get", "post", "put", "delete", "patch", "options", "head"];
const PARAMETER_LOCATIONS: [&str; 4] = ["path", "query", "header", "cookie"];
const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const PATH_REF_PREFIX: &str = "#/paths/";

/// Validate a single OpenAPI document
pub fn validate_document(document: &Value) -> ValidationResult {
    ValidationResult::from_issues(check_document(document))
}

/// Validate a named map of documents, one per service.
///
/// Every diagnostic context is prefixed with the service name; operationIds
/// must not repeat across services, and a service without operations warns.
pub fn validate_documents(documents: &IndexMap<String, Value>) -> ValidationResult {
    let mut issues = Vec::new();
    let mut operation_ids: IndexMap<String, IndexSet<String>> = IndexMap::new();

    for (service, document) in documents {
        issues.extend(
            check_document(document)
                .into_iter()
                .map(|issue| issue.prefixed(service)),
        );

        let mut operations = 0;
        if let Some(paths) = document.pointer("/paths").and_then(Value::as_object) {
            for item in paths.values() {
                let Some(item) = item.as_object() else { continue };
                for (method, operation) in item {
                    if !METHODS.contains(&method.as_str()) {
                        continue;
                    }
                    operations += 1;
                    if let Some(id) = operation.get("operationId").and_then(Value::as_str) {
                        operation_ids
                            .entry(id.to_string())
                            .or_default()
                            .insert(service.clone());
                    }
                }
            }
        }
        if operations == 0 {
            issues.push(
                ValidationIssue::warning(IssueSource::Openapi, "Service defines no operations")
                    .prefixed(service),
            );
        }
    }

    for (id, services) in operation_ids {
        if services.len() > 1 {
            let listed = services.iter().cloned().collect::<Vec<_>>().join(", ");
            issues.push(
                ValidationIssue::error(
                    IssueSource::Openapi,
                    format!("Duplicate operationId '{id}' appears in multiple services"),
                )
                .with_context(listed),
            );
        }
    }

    ValidationResult::from_issues(issues)
}

/// Validate a typed generated document map
pub fn validate_generated(documents: &IndexMap<String, OpenApiDocument>) -> ValidationResult {
    let mut values = IndexMap::new();
    let mut issues = Vec::new();
    for (service, document) in documents {
        match document.to_value() {
            Ok(value) => {
                values.insert(service.clone(), value);
            }
            Err(err) => issues.push(
                ValidationIssue::error(
                    IssueSource::Openapi,
                    format!("Failed to serialize document: {err}"),
                )
                .with_context(service.clone()),
            ),
        }
    }
    let mut result = ValidationResult::from_issues(issues);
    result.merge(validate_documents(&values));
    result
}

fn error(message: impl Into<String>) -> ValidationIssue {
    ValidationIssue::error(IssueSource::Openapi, message)
}

fn warning(message: impl Into<String>) -> ValidationIssue {
    ValidationIssue::warning(IssueSource::Openapi, message)
}

fn check_document(document: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let Some(root) = document.as_object() else {
        issues.push(error("Document is not a JSON object"));
        return issues;
    };

    check_top_level(root, &mut issues);
    if let Some(paths) = root.get("paths").and_then(Value::as_object) {
        check_paths(paths, &mut issues);
    }
    check_references(root, &mut issues);
    detect_cycles(root, &mut issues);

    issues
}

fn check_top_level(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    match root.get("openapi") {
        None => issues.push(error("Missing required field: openapi")),
        Some(Value::String(version)) if version.starts_with("3.") => {}
        Some(_) => issues.push(error("Field 'openapi' must be a string beginning with '3.'")),
    }

    for field in ["title", "version"] {
        let present = root
            .get("info")
            .and_then(Value::as_object)
            .is_some_and(|info| info.contains_key(field));
        if !present {
            issues.push(error(format!("Missing required field: info.{field}")));
        }
    }

    match root.get("paths") {
        None => issues.push(error("Missing required field: paths")),
        Some(Value::Object(_)) => {}
        Some(_) => issues.push(error("Field 'paths' must be an object")),
    }
}

fn check_paths(paths: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            issues.push(error("Path item must be an object").with_context(format!("paths.{path}")));
            continue;
        };
        for (method, operation) in item {
            if !METHODS.contains(&method.as_str()) {
                continue;
            }
            let context = format!("paths.{path}.{method}");
            let Some(operation) = operation.as_object() else {
                issues.push(error("Operation must be an object").with_context(context));
                continue;
            };
            check_operation(path, method, operation, &context, issues);
        }
    }
}

fn check_operation(
    path: &str,
    method: &str,
    operation: &Map<String, Value>,
    context: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    match operation.get("responses") {
        None => issues.push(
            error(format!(
                "Missing responses for {} {path}",
                method.to_uppercase()
            ))
            .with_context(context.to_string()),
        ),
        Some(Value::Object(responses)) => {
            for (status, response) in responses {
                if status != "default" && !is_valid_status(status) {
                    issues.push(
                        error(format!("Invalid response status code '{status}'"))
                            .with_context(context.to_string()),
                    );
                }
                check_content(response, &format!("response '{status}'"), context, issues);
            }
        }
        Some(_) => issues.push(error("Field 'responses' must be an object").with_context(context.to_string())),
    }

    if let Some(request_body) = operation.get("requestBody") {
        check_content(request_body, "request body", context, issues);
    }

    if let Some(parameters) = operation.get("parameters").and_then(Value::as_array) {
        for parameter in parameters {
            check_parameter(parameter, context, issues);
        }
    }
}

fn check_parameter(parameter: &Value, context: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(parameter) = parameter.as_object() else {
        issues.push(error("Parameter must be an object").with_context(context.to_string()));
        return;
    };
    let name = parameter
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>");

    match parameter.get("in").and_then(Value::as_str) {
        Some(location) if PARAMETER_LOCATIONS.contains(&location) => {
            let required = parameter
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if location == "path" && !required {
                issues.push(
                    warning(format!("Path parameter '{name}' should be required"))
                        .with_context(context.to_string()),
                );
            }
        }
        Some(location) => issues.push(
            error(format!("Invalid parameter location '{location}' for '{name}'"))
                .with_context(context.to_string()),
        ),
        None => issues.push(
            error(format!("Parameter '{name}' is missing its location ('in')"))
                .with_context(context.to_string()),
        ),
    }
}

fn is_valid_status(status: &str) -> bool {
    status.len() == 3
        && status
            .parse::<u16>()
            .is_ok_and(|code| (100..=599).contains(&code))
}

fn check_content(owner: &Value, what: &str, context: &str, issues: &mut Vec<ValidationIssue>) {
    match owner.get("content") {
        None => issues.push(
            error(format!("Missing content for {what}")).with_context(context.to_string()),
        ),
        Some(Value::Object(content)) if content.is_empty() => issues.push(
            error(format!("Empty content for {what}")).with_context(context.to_string()),
        ),
        Some(Value::Object(content)) => {
            for (media_type, entry) in content {
                if entry.get("schema").is_none() {
                    issues.push(
                        error(format!("Missing schema for '{media_type}' content of {what}"))
                            .with_context(context.to_string()),
                    );
                }
            }
        }
        Some(_) => issues.push(
            error(format!("Content of {what} must be an object")).with_context(context.to_string()),
        ),
    }
}

fn component_schemas(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    root.get("components")
        .and_then(Value::as_object)
        .and_then(|components| components.get("schemas"))
        .and_then(Value::as_object)
}

/// Every `$ref` must use a `#/` local reference and resolve against the
/// document's component-schema set or path set.
fn check_references(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let schema_names: HashSet<&str> = component_schemas(root)
        .map(|schemas| schemas.keys().map(String::as_str).collect())
        .unwrap_or_default();
    let path_names: HashSet<&str> = root
        .get("paths")
        .and_then(Value::as_object)
        .map(|paths| paths.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut refs = Vec::new();
    collect_refs(root, "$", &mut refs);

    for (reference, location) in refs {
        if !reference.starts_with("#/") {
            issues.push(
                error(format!("Invalid reference '{reference}': must start with '#/'"))
                    .with_context(location),
            );
            continue;
        }
        let resolved = if let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
            schema_names.contains(name)
        } else if let Some(rest) = reference.strip_prefix(PATH_REF_PREFIX) {
            let segment = rest.split('/').next().unwrap_or_default();
            let path = segment.replace("~1", "/").replace("~0", "~");
            path_names.contains(path.as_str())
        } else {
            false
        };
        if !resolved {
            issues.push(
                error(format!("Unresolved reference '{reference}'")).with_context(location),
            );
        }
    }
}

fn collect_refs(value: &Map<String, Value>, location: &str, out: &mut Vec<(String, String)>) {
    for (key, child) in value {
        let child_location = format!("{location}.{key}");
        if key == "$ref" {
            if let Some(reference) = child.as_str() {
                out.push((reference.to_string(), location.to_string()));
            }
            continue;
        }
        match child {
            Value::Object(map) => collect_refs(map, &child_location, out),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let Some(map) = item.as_object() {
                        collect_refs(map, &format!("{child_location}[{index}]"), out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Follow `$ref` chains through `components.schemas`; a ref revisited within
/// the same chain is a cycle, except a direct self-reference, which is a
/// legal recursive structure.
fn detect_cycles(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let Some(schemas) = component_schemas(root) else {
        return;
    };

    // Seed from schemas referenced under paths first, then every component,
    // so chains reachable from operations are walked from their entry point.
    let mut seeds: IndexSet<String> = IndexSet::new();
    if let Some(paths) = root.get("paths").and_then(Value::as_object) {
        let mut refs = Vec::new();
        collect_refs(paths, "$.paths", &mut refs);
        for (reference, _) in refs {
            if let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
                seeds.insert(name.to_string());
            }
        }
    }
    seeds.extend(schemas.keys().cloned());

    let mut visited: HashSet<String> = HashSet::new();
    for seed in &seeds {
        let mut chain = Vec::new();
        follow_refs(seed, schemas, &mut chain, &mut visited, issues);
    }
}

fn follow_refs(
    name: &str,
    schemas: &Map<String, Value>,
    chain: &mut Vec<String>,
    visited: &mut HashSet<String>,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(position) = chain.iter().position(|entry| entry == name) {
        // A node referencing itself directly is permitted.
        let self_reference = position + 1 == chain.len();
        if !self_reference {
            let cycle = chain[position..].join(" -> ");
            issues.push(error(format!("Circular reference detected: {cycle} -> {name}")));
        }
        return;
    }
    if !visited.insert(name.to_string()) {
        return;
    }
    let Some(schema) = schemas.get(name).and_then(Value::as_object) else {
        // Unresolved refs are reported by the reference check.
        return;
    };

    let mut refs = Vec::new();
    collect_refs(schema, "$", &mut refs);
    chain.push(name.to_string());
    for (reference, _) in refs {
        if let Some(target) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
            follow_refs(target, schemas, chain, visited, issues);
        }
    }
    chain.pop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_document() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": {"title": "Test API", "version": "1.0.0"},
            "paths": {
                "/users": {
                    "get": {
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "application/json": {"schema": {"type": "object"}}
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_minimal_document_is_valid() {
        let result = validate_document(&minimal_document());
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_missing_top_level_fields() {
        let result = validate_document(&json!({}));
        let messages: Vec<&str> = result.errors.iter().map(|e| e.message.as_str()).collect();
        assert!(messages.contains(&"Missing required field: openapi"));
        assert!(messages.contains(&"Missing required field: info.title"));
        assert!(messages.contains(&"Missing required field: info.version"));
        assert!(messages.contains(&"Missing required field: paths"));
    }

    #[test]
    fn test_version_must_be_3x() {
        let mut document = minimal_document();
        document["openapi"] = json!("2.0");
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("beginning with '3.'")));
    }

    #[test]
    fn test_missing_responses() {
        let mut document = minimal_document();
        document["paths"]["/users"]["get"] = json!({"summary": "no responses"});
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message == "Missing responses for GET /users"));
    }

    #[test]
    fn test_status_code_range() {
        let mut document = minimal_document();
        document["paths"]["/users"]["get"]["responses"]["999"] =
            json!({"description": "nope", "content": {"application/json": {"schema": {}}}});
        document["paths"]["/users"]["get"]["responses"]["default"] =
            json!({"description": "fallback", "content": {"application/json": {"schema": {}}}});
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("'999'")));
        assert!(!result.errors.iter().any(|e| e.message.contains("'default'")));
    }

    #[test]
    fn test_content_requirements() {
        let mut document = minimal_document();
        document["paths"]["/users"]["get"]["responses"]["200"] = json!({"description": "OK"});
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("Missing content")));

        let mut document = minimal_document();
        document["paths"]["/users"]["get"]["responses"]["200"]["content"]["application/json"] =
            json!({});
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("Missing schema")));
    }

    #[test]
    fn test_parameter_checks() {
        let mut document = minimal_document();
        document["paths"]["/users"]["get"]["parameters"] = json!([
            {"name": "id", "in": "body"},
            {"name": "uid", "in": "path", "required": false},
        ]);
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("Invalid parameter location 'body'")));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("'uid' should be required")));
    }

    #[test]
    fn test_reference_must_be_local() {
        let mut document = minimal_document();
        document["paths"]["/users"]["get"]["responses"]["200"]["content"]["application/json"]
            ["schema"] = json!({"$ref": "http://elsewhere/schema.json"});
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("must start with '#/'")));
    }

    #[test]
    fn test_unresolved_reference() {
        let mut document = minimal_document();
        document["paths"]["/users"]["get"]["responses"]["200"]["content"]["application/json"]
            ["schema"] = json!({"$ref": "#/components/schemas/Missing"});
        let result = validate_document(&document);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("Unresolved reference")));
    }

    #[test]
    fn test_resolved_references_pass() {
        let mut document = minimal_document();
        document["paths"]["/users"]["get"]["responses"]["200"]["content"]["application/json"]
            ["schema"] = json!({"$ref": "#/components/schemas/User"});
        document["components"] = json!({"schemas": {"User": {"type": "object"}}});
        let result = validate_document(&document);
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_self_reference_is_allowed() {
        let mut document = minimal_document();
        document["components"] = json!({
            "schemas": {
                "Node": {
                    "type": "object",
                    "properties": {"next": {"$ref": "#/components/schemas/Node"}}
                }
            }
        });
        let result = validate_document(&document);
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn test_two_node_cycle_detected() {
        let mut document = minimal_document();
        document["components"] = json!({
            "schemas": {
                "A": {"properties": {"b": {"$ref": "#/components/schemas/B"}}},
                "B": {"properties": {"a": {"$ref": "#/components/schemas/A"}}}
            }
        });
        let result = validate_document(&document);
        let cycle = result
            .errors
            .iter()
            .find(|e| e.message.contains("Circular reference"))
            .expect("cycle error");
        assert!(cycle.message.contains("A -> B -> A") || cycle.message.contains("B -> A -> B"));
    }

    #[test]
    fn test_multi_document_context_prefix() {
        let mut documents = IndexMap::new();
        documents.insert("orders".to_string(), json!({}));
        let result = validate_documents(&documents);
        assert!(result
            .errors
            .iter()
            .all(|e| e.context.as_deref().map(|c| c.starts_with("orders")).unwrap_or(false)));
    }

    #[test]
    fn test_duplicate_operation_ids_across_services() {
        let operation = json!({
            "operationId": "listThings",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {"application/json": {"schema": {"type": "object"}}}
                }
            }
        });
        let mut first = minimal_document();
        first["paths"]["/users"]["get"] = operation.clone();
        let mut second = minimal_document();
        second["paths"]["/users"]["get"] = operation;

        let mut documents = IndexMap::new();
        documents.insert("a".to_string(), first);
        documents.insert("b".to_string(), second);
        let result = validate_documents(&documents);
        let duplicate = result
            .errors
            .iter()
            .find(|e| e.message.contains("Duplicate operationId 'listThings'"))
            .expect("duplicate error");
        assert_eq!(duplicate.context.as_deref(), Some("a, b"));
    }

    #[test]
    fn test_empty_service_warns() {
        let mut document = minimal_document();
        document["paths"] = json!({});
        let mut documents = IndexMap::new();
        documents.insert("ghost".to_string(), document);
        let result = validate_documents(&documents);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("no operations")));
    }
}
