//! Typed OpenAPI 3.0 document structure
//!
//! These types serialize to the exact OpenAPI wire shape (camelCase member
//! names, unset fields skipped). Maps are insertion-ordered so the output
//! follows source order deterministically.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use crate::error::Result;
use crate::schema::SchemaObject;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Path template → lowercase HTTP method → operation
pub type PathOperations = IndexMap<String, Operation>;

/// One security requirement entry: scheme key → scope list
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// An OpenAPI document for a single target service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub paths: IndexMap<String, PathOperations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl OpenApiDocument {
    /// New empty document shell for a service
    pub fn shell(service: &str) -> Self {
        Self {
            openapi: "3.0.0".to_string(),
            info: Info {
                title: format!("{service} API"),
                version: "1.0.0".to_string(),
                description: None,
            },
            paths: IndexMap::new(),
            components: None,
            tags: Vec::new(),
        }
    }

    /// Serialize to a JSON value
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialize to a compact JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// API metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An API operation built from one interaction
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "operationId", default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(rename = "externalDocs", default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// An operation parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaObject>,
}

impl Parameter {
    /// A required path parameter with a string schema
    pub fn path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Path,
            required: true,
            schema: Some(SchemaObject::string()),
        }
    }

    /// A query parameter whose schema carries the literal value as example
    pub fn query(name: impl Into<String>, example: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::Query,
            required: false,
            schema: Some(
                SchemaObject::string().with_example(serde_json::Value::String(example.into())),
            ),
        }
    }
}

/// Request body wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

/// Media-type entry under `content`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaObject>,
}

/// Response entry keyed by status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    pub description: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

/// Reusable components section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecuritySchemeObject>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaObject>,
}

impl Components {
    pub fn is_empty(&self) -> bool {
        self.security_schemes.is_empty() && self.schemas.is_empty()
    }
}

/// A security scheme definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecuritySchemeObject {
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(rename = "bearerFormat", default, skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flows: Option<OAuthFlows>,
    #[serde(
        rename = "openIdConnectUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub open_id_connect_url: Option<String>,
}

/// OAuth flow container; only the implicit flow is emitted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OAuthFlows {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
}

/// One OAuth flow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthFlow {
    #[serde(rename = "authorizationUrl")]
    pub authorization_url: String,
    pub scopes: IndexMap<String, String>,
}

/// API tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// External documentation link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shell_defaults() {
        let doc = OpenApiDocument::shell("Orders");
        assert_eq!(doc.openapi, "3.0.0");
        assert_eq!(doc.info.title, "Orders API");
        assert_eq!(doc.info.version, "1.0.0");
        assert!(doc.paths.is_empty());
        assert!(doc.components.is_none());
    }

    #[test]
    fn test_parameter_location_wire_shape() {
        let param = Parameter::path("id");
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["in"], json!("path"));
        assert_eq!(value["required"], json!(true));
    }

    #[test]
    fn test_operation_skips_empty_fields() {
        let op = Operation {
            summary: Some("List users".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&op).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("summary"));
    }

    #[test]
    fn test_security_scheme_renames() {
        let scheme = SecuritySchemeObject {
            scheme_type: "http".to_string(),
            scheme: Some("bearer".to_string()),
            bearer_format: Some("JWT".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&scheme).unwrap();
        assert_eq!(value["type"], json!("http"));
        assert_eq!(value["bearerFormat"], json!("JWT"));
    }
}
