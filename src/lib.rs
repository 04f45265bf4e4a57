//! # apicontract
//!
//! **apicontract** turns an [OpenAPI 3](https://spec.openapis.org/oas/v3.1.0) document into an
//! executable request contract: a compiled table of endpoint schemas, a router that resolves
//! `(method, path)` to an endpoint, and a validator that reports every problem in a request's
//! body, path parameters and query parameters in one pass.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Schema model and the compiler that turns a spec document into an
//!   [`EndpointMap`]. Contract defects are fatal and reported as [`CompileError`].
//! - **[`router`]** - Resolves a method and concrete path to an endpoint key and path params.
//! - **[`validator`]** - Checks request parts against a compiled endpoint and collects
//!   [`Violation`]s.
//! - **[`contract`]** - [`ApiContract`], the read-only compiled state shared by all requests.
//! - **[`request`]** / **[`response`]** - Adapters to and from an HTTP layer.
//! - **[`hot_reload`]** - Atomic replacement of the whole contract when the spec file changes.
//! - **[`runtime_config`]** / **[`logging`]** - Environment-driven configuration and tracing.
//! - **[`cli`]** - The `apicontract` command-line tool.
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Contract as ApiContract
//!     participant Router
//!     participant Validator
//!
//!     Client->>Contract: check_request(GET /pets/42?limit=5)
//!     Contract->>Router: route("GET", "/pets/42")
//!     alt No declared endpoint
//!         Router-->>Contract: RouteNotFound
//!         Contract-->>Client: 404 {"error": "not found"}
//!     end
//!     Router-->>Contract: get:/pets/{petId}, petId=42
//!     Contract->>Validator: validate(key, body, pathParams, queryParams)
//!     alt Violations
//!         Validator-->>Contract: [Violation, ...]
//!         Contract-->>Client: 400 [{property, error}, ...]
//!     end
//!     Validator-->>Contract: []
//!     Contract-->>Client: ValidatedRequest
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use apicontract::{ApiContract, IncomingRequest};
//! use serde_json::json;
//!
//! let contract = ApiContract::compile(&json!({
//!     "paths": {
//!         "/pets/{petId}": { "get": { "parameters": [{
//!             "name": "petId", "in": "path", "required": true,
//!             "schema": { "type": "integer", "minimum": 1 }
//!         }] } }
//!     }
//! })).unwrap();
//!
//! let ok = contract.check_request(IncomingRequest::new("GET", "/pets/42")).unwrap();
//! assert_eq!(ok.endpoint_key(), "get:/pets/{petId}");
//!
//! let rejected = contract.check_request(IncomingRequest::new("GET", "/pets/0")).unwrap_err();
//! assert_eq!(rejected.status.as_u16(), 400);
//! assert_eq!(rejected.body[0]["property"], "pathParams.petId");
//! ```
//!
//! ## Supported Schema Subset
//!
//! Only `string` (`enum`, `minLength`), `integer` (`minimum`, `maximum`), `object`
//! (`properties`, `required`, `additionalProperties`) and `array` (`items`, `minItems`) are
//! understood, each optionally `nullable`. Anything else is rejected when the spec is compiled,
//! never silently ignored at request time.

pub mod cli;
pub mod contract;
pub mod hot_reload;
pub mod logging;
pub mod request;
pub mod response;
pub mod router;
pub mod runtime_config;
pub mod spec;
pub mod validator;

pub use contract::{ApiContract, ValidatedRequest};
pub use request::IncomingRequest;
pub use response::ContractResponse;
pub use router::{RouteMatch, RouteNotFound, Router};
pub use spec::{compile_spec, load_spec, CompileError, EndpointMap, EndpointSchema};
pub use validator::{validate, RequestParts, UnknownEndpoint, Violation};
