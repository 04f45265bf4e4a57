//! # Hot Reload Module
//!
//! Live reloading of a spec file without restarting the process.
//!
//! The current contract lives behind an [`ArcSwap`]. Readers take a cheap
//! snapshot with `load()` and keep using it for the whole request, so a
//! reload never changes the contract underneath an in-flight request.
//!
//! ## Error Handling
//!
//! If the new spec fails to read, dereference or compile, the error is logged
//! and the previous contract stays active. A half-compiled contract is never
//! published.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apicontract::hot_reload::from_config;
//! use apicontract::runtime_config::RuntimeConfig;
//!
//! // APICONTRACT_SPEC=api.yaml APICONTRACT_HOT_RELOAD=1
//! let (contract, _watcher) = from_config(&RuntimeConfig::from_env())?;
//! let snapshot = contract.load();
//! let matched = snapshot.route("GET", "/pets/42")?;
//! ```

use crate::contract::ApiContract;
use crate::runtime_config::{RuntimeConfig, SPEC_ENV};
use anyhow::{anyhow, Context};
use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// A contract that can be replaced atomically while being read.
pub type SharedContract = Arc<ArcSwap<ApiContract>>;

#[must_use]
pub fn shared(contract: ApiContract) -> SharedContract {
    Arc::new(ArcSwap::from_pointee(contract))
}

/// Load the configured spec and, if hot reload is enabled, start watching it.
///
/// The watcher (when present) must be kept alive by the caller.
///
/// # Errors
///
/// Fails when no spec path is configured, the spec does not compile, or the
/// watcher cannot be started.
pub fn from_config(
    config: &RuntimeConfig,
) -> anyhow::Result<(SharedContract, Option<RecommendedWatcher>)> {
    let spec_path = config
        .spec_path
        .as_deref()
        .ok_or_else(|| anyhow!("no spec configured (set {SPEC_ENV})"))?;
    let contract = shared(ApiContract::load(spec_path, config.dereference)?);

    let watcher = if config.hot_reload {
        let watcher = watch_spec(spec_path, Arc::clone(&contract), config.dereference)
            .with_context(|| format!("failed to watch {}", spec_path.display()))?;
        Some(watcher)
    } else {
        None
    };
    Ok((contract, watcher))
}

/// Recompile `spec_path` and publish it on success.
///
/// Returns the number of endpoints in the new contract.
///
/// # Errors
///
/// Returns the load or compile error; `target` is left untouched.
pub fn reload(target: &SharedContract, spec_path: &Path, dereference: bool) -> anyhow::Result<usize> {
    let contract = ApiContract::load(spec_path, dereference)?;
    let count = contract.len();
    target.store(Arc::new(contract));
    Ok(count)
}

/// Watch a spec file and [`reload`] it whenever it is modified or recreated.
///
/// The watcher stops when the returned handle is dropped.
///
/// # Errors
///
/// Returns an error if the watcher cannot be created or the path cannot be
/// watched.
pub fn watch_spec<P>(
    spec_path: P,
    target: SharedContract,
    dereference: bool,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
{
    let path: PathBuf = spec_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match reload(&target, &watch_path, dereference) {
                        Ok(count) => info!(
                            spec_path = %watch_path.display(),
                            endpoints_count = count,
                            "hot-reload: contract replaced"
                        ),
                        Err(e) => error!(
                            spec_path = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous contract"
                        ),
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(spec_path = %path.display(), "hot-reload: watching spec");
    Ok(watcher)
}
