//! # Runtime Configuration Module
//!
//! Environment-variable configuration for the contract engine.
//!
//! ## Environment Variables
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `APICONTRACT_SPEC` | Spec file to load | none |
//! | `APICONTRACT_HOT_RELOAD` | Watch the spec file and reload on change | `false` |
//! | `APICONTRACT_DEREFERENCE` | Expand local `$ref`s before compiling | `true` |
//!
//! Boolean variables accept `1/0`, `true/false`, `yes/no` and `on/off` in any
//! case. Anything else falls back to the default.
//!
//! ```rust
//! use apicontract::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("dereference: {}", config.dereference);
//! ```

use std::env;
use std::path::PathBuf;

pub const SPEC_ENV: &str = "APICONTRACT_SPEC";
pub const HOT_RELOAD_ENV: &str = "APICONTRACT_HOT_RELOAD";
pub const DEREFERENCE_ENV: &str = "APICONTRACT_DEREFERENCE";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub spec_path: Option<PathBuf>,
    pub hot_reload: bool,
    pub dereference: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            spec_path: None,
            hot_reload: false,
            dereference: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        RuntimeConfig {
            spec_path: lookup(SPEC_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            hot_reload: lookup(HOT_RELOAD_ENV)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.hot_reload),
            dereference: lookup(DEREFERENCE_ENV)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.dereference),
        }
    }
}

/// Parse a boolean environment value; `None` if unrecognised.
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
