//! A compiled contract: the endpoint map plus the router built over it.

use crate::request::{parse_query_string, IncomingRequest};
use crate::response::ContractResponse;
use crate::router::{RouteMatch, RouteNotFound, Router};
use crate::spec::{compile_spec, load_spec, CompileError, EndpointMap, EndpointSchema};
use crate::validator::{self, RequestParts, UnknownEndpoint, Violation};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// A request that routed to a declared endpoint and passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub route: RouteMatch,
    pub parts: RequestParts,
}

impl ValidatedRequest {
    #[must_use]
    pub fn endpoint_key(&self) -> &str {
        &self.route.endpoint_key
    }
}

/// Immutable, cheaply clonable contract shared by every request.
#[derive(Debug, Clone)]
pub struct ApiContract {
    endpoints: Arc<EndpointMap>,
    router: Router,
}

impl ApiContract {
    #[must_use]
    pub fn new(endpoints: EndpointMap) -> Self {
        let router = Router::from_endpoints(&endpoints);
        ApiContract {
            endpoints: Arc::new(endpoints),
            router,
        }
    }

    /// Compile an already-parsed document.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] encountered.
    pub fn compile(document: &Value) -> Result<Self, CompileError> {
        compile_spec(document).map(Self::new)
    }

    /// Read, dereference and compile a spec file.
    ///
    /// # Errors
    ///
    /// Returns IO, parse, `$ref` or compile errors.
    pub fn load(path: &Path, dereference: bool) -> anyhow::Result<Self> {
        let contract = Self::new(load_spec(path, dereference)?);
        info!(
            spec_path = %path.display(),
            endpoints_count = contract.len(),
            "Contract ready"
        );
        Ok(contract)
    }

    #[must_use]
    pub fn endpoints(&self) -> &EndpointMap {
        &self.endpoints
    }

    #[must_use]
    pub fn endpoint(&self, endpoint_key: &str) -> Option<&EndpointSchema> {
        self.endpoints.get(endpoint_key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Resolve `(method, path)` to an endpoint key and path params.
    ///
    /// # Errors
    ///
    /// Returns [`RouteNotFound`] when no declared endpoint matches.
    pub fn route(&self, method: &str, path: &str) -> Result<RouteMatch, RouteNotFound> {
        self.router.route(method, path)
    }

    /// Validate parts against a compiled endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEndpoint`] for a key that was never compiled.
    pub fn validate(
        &self,
        endpoint_key: &str,
        parts: &RequestParts,
    ) -> Result<Vec<Violation>, UnknownEndpoint> {
        validator::validate(&self.endpoints, endpoint_key, parts)
    }

    /// Route and validate one incoming request
    ///
    /// Path params come from the route match, query params from the query
    /// string. On failure the returned response is ready to send: 404 for an
    /// undeclared route, 400 with every violation, or 500 if the router and
    /// endpoint map disagree.
    ///
    /// # Errors
    ///
    /// Returns the error [`ContractResponse`] to send instead of dispatching.
    pub fn check_request(&self, req: IncomingRequest) -> Result<ValidatedRequest, ContractResponse> {
        let (path, query) = req.target();
        let route = self
            .route(&req.method, path)
            .map_err(|_| ContractResponse::not_found())?;

        let query_params = query
            .map(parse_query_string)
            .filter(|q| !q.is_empty())
            .map(Value::Object);
        let path_params = if route.path_params.is_empty() {
            None
        } else {
            Some(route.path_params_value())
        };
        let parts = RequestParts {
            request_body: req.body,
            path_params,
            query_params,
        };

        let violations = self.validate(&route.endpoint_key, &parts).map_err(|e| {
            error!(error = %e, "Router returned a key missing from the endpoint map");
            ContractResponse::internal_error()
        })?;
        if !violations.is_empty() {
            return Err(ContractResponse::bad_request(&violations));
        }

        Ok(ValidatedRequest { route, parts })
    }
}
