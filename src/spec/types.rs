use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::fmt;

/// HTTP methods an endpoint may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse a method key exactly as it appears under a spec path item.
    ///
    /// Keys are matched case-sensitively: `GET` is not a valid spec key.
    #[must_use]
    pub fn from_spec_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Put => http::Method::PUT,
            HttpMethod::Post => http::Method::POST,
            HttpMethod::Patch => http::Method::PATCH,
            HttpMethod::Delete => http::Method::DELETE,
        }
    }
}

/// Build the `"{method}:{path}"` key an endpoint is stored under.
#[must_use]
pub fn endpoint_key(method: HttpMethod, path: &str) -> String {
    format!("{}:{}", method.as_str(), path)
}

/// The three loosely-typed parts of a request that carry a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestPart {
    RequestBody,
    PathParams,
    QueryParams,
}

impl RequestPart {
    /// Name used as the root of every diagnostic path within the part.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestPart::RequestBody => "requestBody",
            RequestPart::PathParams => "pathParams",
            RequestPart::QueryParams => "queryParams",
        }
    }
}

impl fmt::Display for RequestPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled validation schema for a single value.
///
/// Every variant carries a dot-delimited `full_path` used in diagnostics and
/// a `nullable` flag; a nullable node accepts `null`/absent values without
/// running any of its other checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValidationSchema {
    String(StringSchema),
    Integer(IntegerSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
}

impl ValidationSchema {
    #[must_use]
    pub fn full_path(&self) -> &str {
        match self {
            ValidationSchema::String(s) => &s.full_path,
            ValidationSchema::Integer(s) => &s.full_path,
            ValidationSchema::Object(s) => &s.full_path,
            ValidationSchema::Array(s) => &s.full_path,
        }
    }

    #[must_use]
    pub fn nullable(&self) -> bool {
        match self {
            ValidationSchema::String(s) => s.nullable,
            ValidationSchema::Integer(s) => s.nullable,
            ValidationSchema::Object(s) => s.nullable,
            ValidationSchema::Array(s) => s.nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSchema {
    pub full_path: String,
    pub nullable: bool,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<IndexSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegerSchema {
    pub full_path: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    pub full_path: String,
    pub nullable: bool,
    pub properties: IndexMap<String, ValidationSchema>,
    /// Names that must be present; each one is a key of `properties`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    pub additional_properties: bool,
}

impl ObjectSchema {
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArraySchema {
    pub full_path: String,
    pub nullable: bool,
    /// Element schema; its `full_path` is this array's path plus `.items`.
    pub item_schema: Box<ValidationSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Value arrives as one `|`-separated string (query parameters only).
    pub pipe_delimited: bool,
}

/// Everything compiled for one declared operation.
///
/// A missing sub-schema means the corresponding request part must be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSchema {
    pub request_body_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body_schema: Option<ObjectSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_params_schema: Option<ObjectSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_params_schema: Option<ObjectSchema>,
}

impl EndpointSchema {
    #[must_use]
    pub fn schema_for(&self, part: RequestPart) -> Option<&ObjectSchema> {
        match part {
            RequestPart::RequestBody => self.request_body_schema.as_ref(),
            RequestPart::PathParams => self.path_params_schema.as_ref(),
            RequestPart::QueryParams => self.query_params_schema.as_ref(),
        }
    }
}

/// Endpoint key to compiled schema, in declaration order.
pub type EndpointMap = IndexMap<String, EndpointSchema>;
