use super::build::compile_spec;
use super::types::EndpointMap;
use anyhow::{anyhow, bail, Context};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Read a spec document from disk
///
/// `.yaml`/`.yml` files go through `serde_yaml`, everything else through
/// `serde_json`. Map key order is preserved, so later passes see paths and
/// properties in declaration order.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read spec file {}", path.display()))?;

    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);

    let document: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML spec {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON spec {}", path.display()))?
    };

    debug!(spec_path = %path.display(), yaml = is_yaml, "Spec document loaded");
    Ok(document)
}

/// Replace every local `$ref` in the document with the value it points at
///
/// Only same-document references (`#/...`) are supported. Sibling keys next
/// to a `$ref` are discarded along with it.
///
/// # Errors
///
/// Returns an error for non-local, unresolvable or cyclic references.
pub fn dereference(document: &mut Value) -> anyhow::Result<()> {
    let root = document.clone();
    let mut stack = Vec::new();
    expand_refs(&root, document, &mut stack)
}

fn expand_refs(root: &Value, value: &mut Value, stack: &mut Vec<String>) -> anyhow::Result<()> {
    match value {
        Value::Object(obj) => {
            if let Some(ref_path) = obj.get("$ref").and_then(Value::as_str).map(str::to_owned) {
                let pointer = ref_path
                    .strip_prefix('#')
                    .filter(|p| p.is_empty() || p.starts_with('/'))
                    .ok_or_else(|| anyhow!("unsupported non-local $ref '{ref_path}'"))?;
                if stack.contains(&ref_path) {
                    bail!("cyclic $ref '{ref_path}'");
                }
                let target = root
                    .pointer(pointer)
                    .ok_or_else(|| anyhow!("unresolvable $ref '{ref_path}'"))?
                    .clone();

                *value = target;
                stack.push(ref_path);
                let result = expand_refs(root, value, stack);
                stack.pop();
                return result;
            }
            for v in obj.values_mut() {
                expand_refs(root, v, stack)?;
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                expand_refs(root, v, stack)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Load, optionally dereference, and compile a spec file in one step.
///
/// # Errors
///
/// Returns IO/parse errors, dereference errors, or the [`super::CompileError`]
/// that stopped compilation.
pub fn load_spec(path: &Path, dereference_refs: bool) -> anyhow::Result<EndpointMap> {
    let mut document = load_document(path)?;
    if dereference_refs {
        dereference(&mut document)
            .with_context(|| format!("failed to dereference {}", path.display()))?;
    }
    let endpoints = compile_spec(&document)?;
    info!(
        spec_path = %path.display(),
        endpoints_count = endpoints.len(),
        "Spec loaded"
    );
    Ok(endpoints)
}
