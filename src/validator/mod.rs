//! # Validator Module
//!
//! Validates the three loosely-typed parts of a request (body, path params,
//! query params) against one compiled [`EndpointSchema`].
//!
//! ## Error Model
//!
//! Request data problems are never errors: they are collected into a flat,
//! ordered list of [`Violation`]s covering every field and every failed
//! check, so a client can fix everything in one round-trip. The only hard
//! failure is [`UnknownEndpoint`], which signals a caller bug rather than bad
//! client data.
//!
//! ## Ordering
//!
//! Parts are checked body, then path params, then query params. Inside an
//! object, missing required fields are reported first (in `required` order),
//! then each present key in the value's own key order. Array elements are
//! checked in index order.
//!
//! ## Example
//!
//! ```rust
//! use apicontract::spec::compile_spec;
//! use apicontract::validator::{validate, RequestParts};
//! use serde_json::json;
//!
//! let endpoints = compile_spec(&json!({
//!     "paths": { "/pets": { "post": {
//!         "requestBody": { "required": true, "content": { "application/json": { "schema": {
//!             "type": "object",
//!             "required": ["name"],
//!             "properties": { "name": { "type": "string", "minLength": 1 } }
//!         } } } }
//!     } } }
//! })).unwrap();
//!
//! let parts = RequestParts::default().with_body(json!({ "name": "" }));
//! let violations = validate(&endpoints, "post:/pets", &parts).unwrap();
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].property, "requestBody.name");
//! ```

mod node;

pub use node::{parse_canonical_integer, validate_node};

use crate::spec::{EndpointMap, EndpointSchema, ObjectSchema, RequestPart};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// One problem found in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dot-delimited path of the offending value, e.g. `requestBody.tags.2`
    pub property: String,
    /// Human-readable description of the problem
    pub error: String,
}

impl Violation {
    pub fn new(property: impl Into<String>, error: impl Into<String>) -> Self {
        Violation {
            property: property.into(),
            error: error.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.error)
    }
}

/// The raw request parts handed over by the HTTP layer.
///
/// Each part is an untyped JSON value, usually an object; `None` means the
/// part was not supplied at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    pub request_body: Option<Value>,
    pub path_params: Option<Value>,
    pub query_params: Option<Value>,
}

impl RequestParts {
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    #[must_use]
    pub fn with_path_params(mut self, params: Value) -> Self {
        self.path_params = Some(params);
        self
    }

    #[must_use]
    pub fn with_query_params(mut self, params: Value) -> Self {
        self.query_params = Some(params);
        self
    }

    #[must_use]
    pub fn get(&self, part: RequestPart) -> Option<&Value> {
        match part {
            RequestPart::RequestBody => self.request_body.as_ref(),
            RequestPart::PathParams => self.path_params.as_ref(),
            RequestPart::QueryParams => self.query_params.as_ref(),
        }
    }
}

/// The validator was asked about an endpoint key that was never compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEndpoint {
    pub endpoint_key: String,
}

impl fmt::Display for UnknownEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown endpoint key '{}'", self.endpoint_key)
    }
}

impl std::error::Error for UnknownEndpoint {}

/// Absent, `null`, `{}`, `[]` and `""` all count as "not supplied".
fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Look up `endpoint_key` and validate `parts` against its schema.
///
/// # Errors
///
/// Returns [`UnknownEndpoint`] if the key is not in `endpoints`. Request data
/// problems are reported in the `Ok` list, never as an error.
pub fn validate(
    endpoints: &EndpointMap,
    endpoint_key: &str,
    parts: &RequestParts,
) -> Result<Vec<Violation>, UnknownEndpoint> {
    let schema = endpoints.get(endpoint_key).ok_or_else(|| UnknownEndpoint {
        endpoint_key: endpoint_key.to_string(),
    })?;
    let violations = validate_request(schema, parts);
    debug!(
        endpoint = %endpoint_key,
        violations = violations.len(),
        "Request validated"
    );
    Ok(violations)
}

/// Validate all three parts of a request against one endpoint schema.
#[must_use]
pub fn validate_request(schema: &EndpointSchema, parts: &RequestParts) -> Vec<Violation> {
    let mut out = Vec::new();

    let body = parts.get(RequestPart::RequestBody);
    if schema.request_body_required && is_empty(body) {
        // A wholesale-missing body gets one violation, not one per field.
        out.push(Violation::new(
            RequestPart::RequestBody.as_str(),
            "required but not present",
        ));
    } else {
        validate_part(RequestPart::RequestBody, schema.request_body_schema.as_ref(), body, &mut out);
    }

    for part in [RequestPart::PathParams, RequestPart::QueryParams] {
        validate_part(part, schema.schema_for(part), parts.get(part), &mut out);
    }

    out
}

/// Validate one request part against its (optional) object schema
///
/// With a schema, an absent part is checked as `{}`. Without one, a
/// non-empty part yields a single `unexpected {part}` violation.
pub fn validate_part(
    part: RequestPart,
    schema: Option<&ObjectSchema>,
    value: Option<&Value>,
    out: &mut Vec<Violation>,
) {
    match schema {
        Some(schema) => {
            let empty = Value::Object(Map::new());
            let value = value.filter(|v| !v.is_null()).unwrap_or(&empty);
            node::validate_object(schema, value, part.as_str(), out);
        }
        None => {
            if !is_empty(value) {
                out.push(Violation::new(part.as_str(), format!("unexpected {part}")));
            }
        }
    }
}
