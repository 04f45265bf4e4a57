//! Request-side adapter between an HTTP layer and the contract.
//!
//! The engine itself only sees loosely-typed JSON parts; this module turns a
//! raw request target (`/path?query`) and body into those parts.

use serde_json::{Map, Value};

/// Parse a raw query string into the loosely-typed query part
///
/// Names and values are URL-decoded (`application/x-www-form-urlencoded`);
/// every value stays a JSON string. A leading `?` is ignored and a repeated
/// key keeps its last value, at the position it first appeared.
///
/// # Example
///
/// ```rust
/// use apicontract::request::parse_query_string;
///
/// let q = parse_query_string("?limit=10&tags=a%7Cb&limit=20");
/// assert_eq!(q["limit"], "20");
/// assert_eq!(q["tags"], "a|b");
/// ```
#[must_use]
pub fn parse_query_string(raw: &str) -> Map<String, Value> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

/// A request as handed over by the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingRequest {
    /// HTTP method in any case
    pub method: String,
    /// Request path, optionally still carrying `?query`
    pub path: String,
    /// Raw query string; takes precedence over one embedded in `path`
    pub query: Option<String>,
    /// Parsed JSON body, if any
    pub body: Option<Value>,
}

impl IncomingRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        IncomingRequest {
            method: method.into(),
            path: path.into(),
            query: None,
            body: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Split the target into `(path, query)`.
    #[must_use]
    pub fn target(&self) -> (&str, Option<&str>) {
        let (path, embedded) = match self.path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.path.as_str(), None),
        };
        (path, self.query.as_deref().or(embedded))
    }
}
