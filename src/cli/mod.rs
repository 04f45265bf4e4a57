//! # CLI Module
//!
//! Command-line front end for compiling a contract and checking requests
//! against it.
//!
//! ## Commands
//!
//! | Command | Does |
//! |---------|------|
//! | `check` | Compile the spec; fails on the first contract defect |
//! | `routes` | List endpoint keys in compiled order |
//! | `schema` | Dump compiled endpoint schemas as JSON |
//! | `route` | Resolve a method and path to an endpoint key |
//! | `validate` | Route and validate one request, print the response |
//! | `watch` | Keep a hot-reloading contract loaded |
//!
//! Every command takes `--spec <FILE>`, which falls back to
//! `APICONTRACT_SPEC`.
//!
//! ## Exit Codes
//!
//! - `0` success
//! - `1` the request was rejected (route miss or violations)
//! - `2` the spec could not be loaded or compiled, or arguments were invalid
//!
//! ## Examples
//!
//! ```bash
//! apicontract check --spec openapi.yaml
//!
//! apicontract validate --spec openapi.yaml \
//!     --method POST --path /pets \
//!     --body '{"name": "Fluffy"}'
//!
//! apicontract route --spec openapi.yaml --method GET --path /pets/42
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands, Outcome};
