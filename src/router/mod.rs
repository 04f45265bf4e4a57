//! # Router Module
//!
//! Resolves an inbound `(method, path)` pair to one of the compiled endpoint
//! keys and extracts the raw values of its `{name}` path parameters.
//!
//! ## Matching
//!
//! 1. **Normalize**: lowercase the method and strip one trailing `/`.
//! 2. **Exact match**: a `"{method}:{path}"` key with no placeholders is found
//!    with a single hash lookup.
//! 3. **Pattern scan**: otherwise only the keys containing `{` are walked, in
//!    compiled order. Segment counts must agree, literals must match exactly
//!    and placeholders capture whatever segment sits in their position. The
//!    first pattern that matches through its last segment wins.
//!
//! ## Example
//!
//! ```rust
//! use apicontract::router::Router;
//!
//! let router = Router::new(["get:/pets", "get:/pets/{id}"]);
//!
//! let m = router.route("GET", "/pets/42/").unwrap();
//! assert_eq!(&*m.endpoint_key, "get:/pets/{id}");
//! assert_eq!(m.get_path_param("id"), Some("42"));
//!
//! assert!(router.route("GET", "/owners").is_err());
//! ```

mod core;

pub use self::core::{ParamVec, RouteMatch, RouteNotFound, Router, MAX_INLINE_PARAMS};
