//! Multi-service OpenAPI document generation
//!
//! Two passes over the diagram's interactions, scoped per target service.
//! Pass 1 counts structural schema fingerprints so pass 2 knows which body
//! schemas repeat and deserve extraction into `components.schemas`. All
//! working state lives in per-call accumulators; generation never fails and
//! always returns a complete best-effort document map.
//!
//! Copyright (c) 2025 Seqspec Team
//! Licensed under the Apache-2.0 license

use super::document::{
    Components, ExternalDocs, MediaType, OAuthFlow, OAuthFlows, OpenApiDocument, Operation,
    Parameter, PathOperations, RequestBody, ResponseObject, SecurityRequirement,
    SecuritySchemeObject, Tag,
};
use crate::diagram::{parse, Diagram, Interaction, SecurityDescriptor};
use crate::schema::{generate_object, infer_value, SchemaObject};
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

const DEFAULT_MEDIA_TYPE: &str = "application/json";
const OAUTH_AUTHORIZATION_URL: &str = "https://example.com/oauth/authorize";
const OPENID_DISCOVERY_URL: &str = "https://example.com/.well-known/openid-configuration";

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Generate one OpenAPI document per target service from raw diagram text
pub fn generate_specs(input: &str) -> IndexMap<String, OpenApiDocument> {
    generate_from_diagram(&parse(input))
}

/// Generate one OpenAPI document per target service from a parsed diagram
pub fn generate_from_diagram(diagram: &Diagram) -> IndexMap<String, OpenApiDocument> {
    let global_tags = collect_tags(diagram);
    let mut usage = count_schema_usage(diagram);
    let mut services: IndexMap<String, ServiceState> = IndexMap::new();

    for interaction in &diagram.interactions {
        let service = interaction.to.clone();
        let state = services.entry(service.clone()).or_insert_with(|| {
            debug!(service = %service, "creating document shell");
            ServiceState::new(usage.remove(&service).unwrap_or_default())
        });
        state.add_operation(interaction);
    }

    services
        .into_iter()
        .map(|(service, state)| {
            let document = state.finish(&service, &global_tags);
            (service, document)
        })
        .collect()
}

/// Union of all interaction tags, in encounter order
fn collect_tags(diagram: &Diagram) -> Vec<Tag> {
    let mut names: IndexSet<&str> = IndexSet::new();
    for interaction in &diagram.interactions {
        for tag in &interaction.tags {
            names.insert(tag.as_str());
        }
    }
    names
        .into_iter()
        .map(|name| Tag {
            name: name.to_string(),
        })
        .collect()
}

/// Pass 1: per-service fingerprint usage counts for every interaction body
fn count_schema_usage(diagram: &Diagram) -> HashMap<String, HashMap<String, usize>> {
    let mut usage: HashMap<String, HashMap<String, usize>> = HashMap::new();
    for interaction in &diagram.interactions {
        if let Some(body) = &interaction.body {
            let schema = schema_for_body(body);
            if !schema.properties.is_empty() {
                *usage
                    .entry(interaction.to.clone())
                    .or_default()
                    .entry(schema.fingerprint())
                    .or_insert(0) += 1;
            }
        }
    }
    usage
}

/// Body value → schema; objects go through the property-wise generator,
/// everything else through single-value inference.
fn schema_for_body(body: &serde_json::Value) -> SchemaObject {
    match body {
        serde_json::Value::Object(map) => generate_object(map),
        other => infer_value(other).schema,
    }
}

/// Per-service accumulator threaded through pass 2
struct ServiceState {
    paths: IndexMap<String, PathOperations>,
    schemas: IndexMap<String, SchemaObject>,
    security_schemes: IndexMap<String, SecuritySchemeObject>,
    usage: HashMap<String, usize>,
    extracted: HashMap<String, String>,
    used_names: HashSet<String>,
}

impl ServiceState {
    fn new(usage: HashMap<String, usize>) -> Self {
        Self {
            paths: IndexMap::new(),
            schemas: IndexMap::new(),
            security_schemes: IndexMap::new(),
            usage,
            extracted: HashMap::new(),
            used_names: HashSet::new(),
        }
    }

    fn add_operation(&mut self, interaction: &Interaction) {
        let (path, parameters) = split_path(&interaction.path);

        let mut operation = Operation {
            summary: Some(
                interaction
                    .summary
                    .clone()
                    .unwrap_or_else(|| format!("Operation for {path}")),
            ),
            description: interaction.description.clone(),
            tags: interaction.tags.clone(),
            operation_id: interaction.operation_id.clone(),
            deprecated: interaction.deprecated,
            external_docs: interaction
                .external_docs_url
                .clone()
                .map(|url| ExternalDocs { url }),
            parameters,
            ..Default::default()
        };

        for descriptor in &interaction.security {
            self.register_security(descriptor, &mut operation);
        }

        if let Some(response) = &interaction.response {
            let status = if response.status.is_empty() {
                "200".to_string()
            } else {
                response.status.clone()
            };
            let description = response
                .description
                .clone()
                .unwrap_or_else(|| "Response description".to_string());
            // GET-style echo: a body on a non-payload method describes the
            // response; otherwise the response carries a bare object schema.
            let schema = if interaction.method.accepts_request_body() {
                None
            } else {
                interaction
                    .body
                    .as_ref()
                    .map(|body| self.extract_or_inline(schema_for_body(body)))
            }
            .unwrap_or_else(SchemaObject::object);

            let mut content = IndexMap::new();
            content.insert(DEFAULT_MEDIA_TYPE.to_string(), MediaType { schema: Some(schema) });
            operation
                .responses
                .insert(status, ResponseObject { description, content });
        }

        if interaction.method.accepts_request_body() {
            if let Some(body) = &interaction.body {
                let schema = self.extract_or_inline(schema_for_body(body));
                let media_type = interaction
                    .request_media_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());
                let mut content = IndexMap::new();
                content.insert(media_type, MediaType { schema: Some(schema) });
                operation.request_body = Some(RequestBody {
                    required: true,
                    content,
                });
            }
        }

        self.paths
            .entry(path)
            .or_default()
            .insert(interaction.method.lowercase().to_string(), operation);
    }

    /// Register the scheme component (once per descriptor key) and append
    /// the operation's security requirement. Custom descriptors are dropped.
    fn register_security(&mut self, descriptor: &SecurityDescriptor, operation: &mut Operation) {
        let Some(scheme) = scheme_object(descriptor) else {
            return;
        };
        let key = descriptor.key();
        self.security_schemes.entry(key.clone()).or_insert(scheme);

        let mut requirement = SecurityRequirement::new();
        requirement.insert(key, descriptor.scopes());
        operation.security.push(requirement);
    }

    /// Component extraction: inline singletons, `$ref` repeated shapes.
    fn extract_or_inline(&mut self, schema: SchemaObject) -> SchemaObject {
        // Primitives and simple arrays always stay inline.
        if schema.properties.is_empty() {
            return schema;
        }
        let fingerprint = schema.fingerprint();
        if self.usage.get(&fingerprint).copied().unwrap_or(0) <= 1 {
            return schema;
        }
        if let Some(name) = self.extracted.get(&fingerprint) {
            return SchemaObject::reference(format!("#/components/schemas/{name}"));
        }
        let name = self.component_name(&schema);
        self.extracted.insert(fingerprint, name.clone());
        self.schemas.insert(name.clone(), schema);
        SchemaObject::reference(format!("#/components/schemas/{name}"))
    }

    /// Component names come from the first three property keys, capitalized
    /// and suffixed `Schema`; collisions append an increasing integer.
    fn component_name(&mut self, schema: &SchemaObject) -> String {
        let stem: String = schema
            .properties
            .keys()
            .take(3)
            .map(|key| capitalize(key))
            .collect();
        let base = format!("{stem}Schema");
        let mut candidate = base.clone();
        let mut counter = 2;
        while self.used_names.contains(&candidate) {
            candidate = format!("{base}{counter}");
            counter += 1;
        }
        self.used_names.insert(candidate.clone());
        candidate
    }

    fn finish(self, service: &str, tags: &[Tag]) -> OpenApiDocument {
        let mut document = OpenApiDocument::shell(service);
        document.tags = tags.to_vec();
        document.paths = self.paths;
        let components = Components {
            security_schemes: self.security_schemes,
            schemas: self.schemas,
        };
        if !components.is_empty() {
            document.components = Some(components);
        }
        document
    }
}

/// Split a raw path into the clean template plus extracted parameters:
/// query `key=value` pairs first, then `{name}` path placeholders.
fn split_path(raw: &str) -> (String, Vec<Parameter>) {
    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    };

    let mut parameters = Vec::new();
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if !key.is_empty() {
                    parameters.push(Parameter::query(key, value));
                }
            }
        }
    }
    for caps in placeholder_re().captures_iter(path) {
        parameters.push(Parameter::path(&caps[1]));
    }

    (path.to_string(), parameters)
}

/// Fixed descriptor-to-scheme table; returns None for custom descriptors
fn scheme_object(descriptor: &SecurityDescriptor) -> Option<SecuritySchemeObject> {
    match descriptor {
        SecurityDescriptor::Bearer => Some(SecuritySchemeObject {
            scheme_type: "http".to_string(),
            scheme: Some("bearer".to_string()),
            bearer_format: Some("JWT".to_string()),
            ..Default::default()
        }),
        SecurityDescriptor::Basic => Some(SecuritySchemeObject {
            scheme_type: "http".to_string(),
            scheme: Some("basic".to_string()),
            ..Default::default()
        }),
        SecurityDescriptor::ApiKey { location } => Some(SecuritySchemeObject {
            scheme_type: "apiKey".to_string(),
            location: Some(location.as_str().to_string()),
            name: Some("X-API-Key".to_string()),
            ..Default::default()
        }),
        SecurityDescriptor::OAuth2 { scopes } => {
            let scope_map: IndexMap<String, String> = scopes
                .iter()
                .map(|scope| (scope.clone(), format!("{scope} permission")))
                .collect();
            Some(SecuritySchemeObject {
                scheme_type: "oauth2".to_string(),
                flows: Some(OAuthFlows {
                    implicit: Some(OAuthFlow {
                        authorization_url: OAUTH_AUTHORIZATION_URL.to_string(),
                        scopes: scope_map,
                    }),
                }),
                ..Default::default()
            })
        }
        SecurityDescriptor::OpenIdConnect => Some(SecuritySchemeObject {
            scheme_type: "openIdConnect".to_string(),
            open_id_connect_url: Some(OPENID_DISCOVERY_URL.to_string()),
            ..Default::default()
        }),
        SecurityDescriptor::Custom(_) => None,
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
