use std::fmt;

/// A defect in the spec document that prevents compilation.
///
/// Compilation stops at the first defect; there is never a partially
/// compiled endpoint map. Every variant names the endpoint (or declared path)
/// and the field at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The document has no `paths` object.
    MissingPaths,
    /// A path item or operation is not a JSON object.
    NotAnObject {
        /// Declared path or endpoint key
        location: String,
    },
    /// A key under a path item is not one of get/put/post/patch/delete.
    UnsupportedMethod { path: String, method: String },
    /// The declared path itself is malformed.
    InvalidPath { path: String, reason: String },
    /// The same `{name}` placeholder appears twice in one path.
    DuplicatePathParam { endpoint: String, name: String },
    /// `requestBody` is present but unusable.
    InvalidRequestBody { endpoint: String, reason: String },
    /// Path placeholders or a `parameters` key exist but no parameters are declared.
    MissingParameters { endpoint: String },
    /// A single `parameters[]` entry is unusable.
    InvalidParameter {
        endpoint: String,
        name: String,
        reason: String,
    },
    /// A placeholder without a declared path parameter, or the reverse.
    PathParamMismatch {
        endpoint: String,
        name: String,
        declared_in_path: bool,
    },
    /// A schema node failed type dispatch or a keyword check.
    InvalidSchema {
        endpoint: String,
        schema_path: String,
        reason: String,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::MissingPaths => {
                write!(f, "spec compilation failed: document has no 'paths' object")
            }
            CompileError::NotAnObject { location } => {
                write!(f, "spec compilation failed: {location}: expected an object")
            }
            CompileError::UnsupportedMethod { path, method } => {
                write!(
                    f,
                    "spec compilation failed: {path}: unsupported http method '{method}' \
                    (expected one of get, put, post, patch, delete)"
                )
            }
            CompileError::InvalidPath { path, reason } => {
                write!(f, "spec compilation failed: path '{path}': {reason}")
            }
            CompileError::DuplicatePathParam { endpoint, name } => {
                write!(
                    f,
                    "spec compilation failed: {endpoint}: path parameter '{name}' appears more than once"
                )
            }
            CompileError::InvalidRequestBody { endpoint, reason } => {
                write!(f, "spec compilation failed: {endpoint}: requestBody {reason}")
            }
            CompileError::MissingParameters { endpoint } => {
                write!(
                    f,
                    "spec compilation failed: {endpoint}: a non-empty 'parameters' array is required"
                )
            }
            CompileError::InvalidParameter {
                endpoint,
                name,
                reason,
            } => {
                if name.is_empty() {
                    write!(f, "spec compilation failed: {endpoint}: parameter {reason}")
                } else {
                    write!(
                        f,
                        "spec compilation failed: {endpoint}: parameter '{name}' {reason}"
                    )
                }
            }
            CompileError::PathParamMismatch {
                endpoint,
                name,
                declared_in_path,
            } => {
                if *declared_in_path {
                    write!(
                        f,
                        "spec compilation failed: {endpoint}: path placeholder '{{{name}}}' \
                        has no matching 'in: path' parameter"
                    )
                } else {
                    write!(
                        f,
                        "spec compilation failed: {endpoint}: path parameter '{name}' \
                        does not appear in the path"
                    )
                }
            }
            CompileError::InvalidSchema {
                endpoint,
                schema_path,
                reason,
            } => {
                write!(
                    f,
                    "spec compilation failed: {endpoint}: schema at '{schema_path}' {reason}"
                )
            }
        }
    }
}

impl std::error::Error for CompileError {}
