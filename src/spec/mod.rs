//! # Spec Module
//!
//! Loads a spec document and compiles it into the endpoint map used by the
//! router and validator.
//!
//! - [`load_document`] reads YAML or JSON; [`dereference`] expands local `$ref`s.
//! - [`compile_spec`] turns the dereferenced document into an [`EndpointMap`],
//!   failing on the first defect with a [`CompileError`].
//! - The schema types hold the compiled model shared by everything else.

mod build;
mod error;
mod load;
mod types;

pub use build::*;
pub use error::CompileError;
pub use load::*;
pub use types::*;
