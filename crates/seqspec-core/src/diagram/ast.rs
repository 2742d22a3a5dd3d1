//! Abstract syntax tree for the sequence-diagram notation
//!
//! The parser produces one [`Diagram`] per input text: the declared (or
//! implicitly registered) participant set, the ordered interaction list, and
//! any diagnostic notes recorded while parsing. Interactions own their paired
//! response; a response is never stored as a separate entity.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP methods recognized by the notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// All recognized methods, in canonical listing order
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    /// Parse a method name case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            "OPTIONS" => Some(HttpMethod::Options),
            "HEAD" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    /// Canonical uppercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Lowercase name as used for OpenAPI path-item keys
    pub fn lowercase(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }

    /// Whether a body on this method describes a request payload.
    /// Other methods treat an attached body as an echoed response schema.
    pub fn accepts_request_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Location of an apiKey security scheme parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Header,
    Query,
}

impl ApiKeyLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyLocation::Header => "header",
            ApiKeyLocation::Query => "query",
        }
    }
}

/// One recognized authentication mechanism, parsed from a `Security:`
/// descriptor at the note boundary.
///
/// Unrecognized descriptors are kept verbatim as [`SecurityDescriptor::Custom`];
/// the generator drops them when building scheme objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityDescriptor {
    Bearer,
    Basic,
    ApiKey { location: ApiKeyLocation },
    OAuth2 { scopes: Vec<String> },
    OpenIdConnect,
    Custom(String),
}

impl SecurityDescriptor {
    /// Classify one raw descriptor string.
    ///
    /// `apiKey in header|query` defaults to header when the location is
    /// unspecified; `oauth2[a,b]` carries its scope list.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lowered = trimmed.to_ascii_lowercase();

        if lowered.contains("bearer") {
            SecurityDescriptor::Bearer
        } else if lowered.contains("basic") {
            SecurityDescriptor::Basic
        } else if lowered.contains("apikey") || lowered.contains("api key") {
            let location = if lowered.contains("query") {
                ApiKeyLocation::Query
            } else {
                ApiKeyLocation::Header
            };
            SecurityDescriptor::ApiKey { location }
        } else if lowered.contains("oauth2") {
            let scopes = trimmed
                .find('[')
                .and_then(|open| trimmed[open..].find(']').map(|close| (open, open + close)))
                .map(|(open, close)| {
                    trimmed[open + 1..close]
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            SecurityDescriptor::OAuth2 { scopes }
        } else if lowered.contains("openid") {
            SecurityDescriptor::OpenIdConnect
        } else {
            SecurityDescriptor::Custom(trimmed.to_string())
        }
    }

    /// Normalized descriptor key, used both as the securitySchemes component
    /// key and in operation security requirements.
    pub fn key(&self) -> String {
        match self {
            SecurityDescriptor::Bearer => "bearerAuth".to_string(),
            SecurityDescriptor::Basic => "basicAuth".to_string(),
            SecurityDescriptor::ApiKey { location } => format!("apiKey_{}", location.as_str()),
            SecurityDescriptor::OAuth2 { scopes } if scopes.is_empty() => "oauth2".to_string(),
            SecurityDescriptor::OAuth2 { scopes } => format!("oauth2:{}", scopes.join(",")),
            SecurityDescriptor::OpenIdConnect => "openIdConnect".to_string(),
            SecurityDescriptor::Custom(raw) => raw.clone(),
        }
    }

    /// Scope list for the operation security requirement entry; non-empty
    /// only for scoped oauth2 descriptors.
    pub fn scopes(&self) -> Vec<String> {
        match self {
            SecurityDescriptor::OAuth2 { scopes } => scopes.clone(),
            _ => Vec::new(),
        }
    }
}

/// Status/description pair merged into an interaction on successful pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub status: String,
    pub description: Option<String>,
    pub line: usize,
}

/// One logical request, with whatever the notes attached to it contributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub from: String,
    pub to: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub response: Option<InteractionResponse>,
    pub body: Option<Value>,
    pub security: Vec<SecurityDescriptor>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub deprecated: bool,
    pub external_docs_url: Option<String>,
    pub request_media_type: Option<String>,
    pub line: usize,
}

impl Interaction {
    pub fn new(from: String, to: String, method: HttpMethod, path: String, line: usize) -> Self {
        Self {
            from,
            to,
            method,
            path,
            summary: None,
            response: None,
            body: None,
            security: Vec::new(),
            tags: Vec::new(),
            description: None,
            operation_id: None,
            deprecated: false,
            external_docs_url: None,
            request_media_type: None,
            line,
        }
    }
}

/// Kind of diagnostic note recorded during parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseNoteKind {
    OrphanedResponse,
    OrphanedNote,
    InvalidBodyJson,
}

/// Diagnostic record attached to the AST; parsing never aborts on these
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseNote {
    pub kind: ParseNoteKind,
    pub line: usize,
    pub message: String,
}

/// The parsed diagram: participant set, ordered interactions, diagnostics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    pub participants: IndexSet<String>,
    pub interactions: Vec<Interaction>,
    pub notes: Vec<ParseNote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("Post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("DELETE"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("FETCH"), None);
    }

    #[test]
    fn test_request_body_methods() {
        assert!(HttpMethod::Post.accepts_request_body());
        assert!(HttpMethod::Put.accepts_request_body());
        assert!(HttpMethod::Patch.accepts_request_body());
        assert!(!HttpMethod::Get.accepts_request_body());
        assert!(!HttpMethod::Delete.accepts_request_body());
    }

    #[test]
    fn test_security_descriptor_classification() {
        assert_eq!(SecurityDescriptor::parse("bearerAuth"), SecurityDescriptor::Bearer);
        assert_eq!(SecurityDescriptor::parse("Basic auth"), SecurityDescriptor::Basic);
        assert_eq!(
            SecurityDescriptor::parse("apiKey in query"),
            SecurityDescriptor::ApiKey { location: ApiKeyLocation::Query }
        );
        assert_eq!(
            SecurityDescriptor::parse("apiKey"),
            SecurityDescriptor::ApiKey { location: ApiKeyLocation::Header }
        );
        assert_eq!(
            SecurityDescriptor::parse("oauth2[read,write]"),
            SecurityDescriptor::OAuth2 { scopes: vec!["read".to_string(), "write".to_string()] }
        );
        assert_eq!(
            SecurityDescriptor::parse("oauth2"),
            SecurityDescriptor::OAuth2 { scopes: vec![] }
        );
        assert_eq!(SecurityDescriptor::parse("openIdConnect"), SecurityDescriptor::OpenIdConnect);
        assert_eq!(
            SecurityDescriptor::parse("x-custom-auth"),
            SecurityDescriptor::Custom("x-custom-auth".to_string())
        );
    }

    #[test]
    fn test_security_descriptor_keys() {
        assert_eq!(SecurityDescriptor::Bearer.key(), "bearerAuth");
        assert_eq!(
            SecurityDescriptor::ApiKey { location: ApiKeyLocation::Header }.key(),
            "apiKey_header"
        );
        assert_eq!(
            SecurityDescriptor::OAuth2 { scopes: vec!["read".into(), "write".into()] }.key(),
            "oauth2:read,write"
        );
        assert_eq!(SecurityDescriptor::OAuth2 { scopes: vec![] }.key(), "oauth2");
    }
}
