//! Router core module - hot path for request routing.

use crate::spec::EndpointMap;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/{id}/posts/{postId}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` because they come from the compiled route table
/// and are shared by every match; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of successfully matching a request to a declared endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The compiled endpoint key, e.g. `get:/pets/{id}`
    pub endpoint_key: Arc<str>,
    /// Raw path segment values bound to each `{name}` placeholder, in path order
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to HashMap
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Path params as the loosely-typed object the validator consumes
    #[must_use]
    pub fn path_params_value(&self) -> Value {
        let map: Map<String, Value> = self
            .path_params
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }
}

/// No declared endpoint matches the request.
///
/// Deliberately carries only what the caller sent; it never exposes schema
/// detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNotFound {
    pub method: String,
    pub path: String,
}

impl fmt::Display for RouteNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no endpoint matches {} {}", self.method, self.path)
    }
}

impl std::error::Error for RouteNotFound {}

#[derive(Debug)]
enum Segment {
    Literal(Box<str>),
    Param(Arc<str>),
}

#[derive(Debug)]
struct Candidate {
    key: Arc<str>,
    method: Box<str>,
    segments: Vec<Segment>,
}

/// Router that resolves `(method, path)` to a compiled endpoint key
///
/// Keys without placeholders are answered from a hash set in O(1). Keys with
/// `{name}` segments are scanned in compiled order and the first full match
/// wins; overlapping patterns are not ranked by specificity, so declaration
/// order decides.
///
/// Cloning is cheap: the tables are shared behind `Arc`.
#[derive(Debug, Clone)]
pub struct Router {
    exact: Arc<HashSet<Arc<str>>>,
    candidates: Arc<Vec<Candidate>>,
}

impl Router {
    /// Build a router from the compiled endpoint keys, in iteration order.
    #[must_use]
    pub fn new<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut exact = HashSet::new();
        let mut candidates = Vec::new();

        for key in keys {
            let key: Arc<str> = Arc::from(key);
            if let Some((method, path)) = key.split_once(':') {
                if path.contains('{') {
                    let segments = path
                        .split('/')
                        .map(|segment| {
                            match segment
                                .strip_prefix('{')
                                .and_then(|s| s.strip_suffix('}'))
                            {
                                Some(name) => Segment::Param(Arc::from(name)),
                                None => Segment::Literal(Box::from(segment)),
                            }
                        })
                        .collect();
                    candidates.push(Candidate {
                        key: Arc::clone(&key),
                        method: Box::from(method),
                        segments,
                    });
                }
            } else {
                warn!(endpoint = %key, "Endpoint key without method separator");
            }
            exact.insert(key);
        }

        info!(
            routes_count = exact.len(),
            parameterized_count = candidates.len(),
            "Routing table loaded"
        );

        Self {
            exact: Arc::new(exact),
            candidates: Arc::new(candidates),
        }
    }

    /// Build a router over every key of a compiled endpoint map.
    #[must_use]
    pub fn from_endpoints(endpoints: &EndpointMap) -> Self {
        Self::new(endpoints.keys().map(String::as_str))
    }

    /// Number of endpoint keys known to the router
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Match an HTTP request to an endpoint
    ///
    /// The method is lowercased and exactly one trailing `/` is removed from
    /// the path (the root path `/` is kept as is) before lookup.
    ///
    /// # Errors
    ///
    /// Returns [`RouteNotFound`] when neither an exact key nor a
    /// parameterized pattern matches.
    pub fn route(&self, method: &str, raw_path: &str) -> Result<RouteMatch, RouteNotFound> {
        let match_start = std::time::Instant::now();

        let method = method.to_ascii_lowercase();
        let path = if raw_path.len() > 1 {
            raw_path.strip_suffix('/').unwrap_or(raw_path)
        } else {
            raw_path
        };

        let candidate_key = format!("{method}:{path}");
        if let Some(key) = self.exact.get(candidate_key.as_str()) {
            debug!(
                method = %method,
                path = %raw_path,
                endpoint = %key,
                duration_us = match_start.elapsed().as_micros(),
                "Route matched exactly"
            );
            return Ok(RouteMatch {
                endpoint_key: Arc::clone(key),
                path_params: ParamVec::new(),
            });
        }

        let raw_segments: SmallVec<[&str; 16]> = path.split('/').collect();
        'candidates: for candidate in self.candidates.iter() {
            if *candidate.method != *method || candidate.segments.len() != raw_segments.len() {
                continue;
            }

            let mut params = ParamVec::new();
            for (segment, raw) in candidate.segments.iter().zip(raw_segments.iter()) {
                match segment {
                    Segment::Param(name) => params.push((Arc::clone(name), (*raw).to_string())),
                    Segment::Literal(literal) => {
                        if **literal != **raw {
                            continue 'candidates;
                        }
                    }
                }
            }

            debug!(
                method = %method,
                path = %raw_path,
                endpoint = %candidate.key,
                path_params = ?params,
                duration_us = match_start.elapsed().as_micros(),
                "Route matched"
            );
            return Ok(RouteMatch {
                endpoint_key: Arc::clone(&candidate.key),
                path_params: params,
            });
        }

        warn!(
            method = %method,
            path = %raw_path,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        Err(RouteNotFound {
            method,
            path: raw_path.to_string(),
        })
    }
}
