//! Response-side adapter: the error responses a contract check produces.

use crate::validator::Violation;
use http::StatusCode;
use serde_json::{json, Value};

/// A ready-to-send error response.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ContractResponse {
    /// 400 with one `{property, error}` object per violation, in order.
    #[must_use]
    pub fn bad_request(violations: &[Violation]) -> Self {
        let body = violations
            .iter()
            .map(|v| json!({ "property": v.property, "error": v.error }))
            .collect();
        ContractResponse {
            status: StatusCode::BAD_REQUEST,
            body: Value::Array(body),
        }
    }

    /// 404 that leaks nothing about the declared endpoints.
    #[must_use]
    pub fn not_found() -> Self {
        ContractResponse {
            status: StatusCode::NOT_FOUND,
            body: json!({ "error": "not found" }),
        }
    }

    #[must_use]
    pub fn internal_error() -> Self {
        ContractResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": "internal server error" }),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    #[must_use]
    pub fn content_type(&self) -> &'static str {
        "application/json"
    }

    /// Serialized body, as written to the wire.
    #[must_use]
    pub fn body_bytes(&self) -> Vec<u8> {
        self.body.to_string().into_bytes()
    }
}
