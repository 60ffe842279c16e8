#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for building and reading `$ref` pointers into the component
//! table. Only local references (`#/...`) are ever produced or understood.

use crate::error::{AppError, AppResult};
use crate::oas::components::ComponentKind;
use crate::oas::version::OpenApiVersion;
use serde_json::{json, Value};

const DEFS_PREFIX: &str = "#/$defs/";

/// Builds the `$ref` pointer string for a component.
///
/// e.g. `Schema`, 3.1.0, `Pet` -> `#/components/schemas/Pet`
pub fn reference_path(kind: ComponentKind, version: OpenApiVersion, name: &str) -> AppResult<String> {
    let section = kind.section(version).ok_or_else(|| {
        AppError::General(format!(
            "OpenAPI {} has no section for {} components",
            version, kind
        ))
    })?;
    Ok(format!("#/{}/{}", section, name))
}

/// Builds a Reference Object (`{"$ref": ...}`) for a component.
pub fn build_reference(kind: ComponentKind, version: OpenApiVersion, name: &str) -> AppResult<Value> {
    Ok(json!({ "$ref": reference_path(kind, version, name)? }))
}

/// Extracts the component name from a local `$ref` pointing into `kind`'s section.
///
/// Returns `None` for pointers into any other place.
pub fn extract_component_name(
    ref_str: &str,
    kind: ComponentKind,
    version: OpenApiVersion,
) -> Option<String> {
    let section = kind.section(version)?;
    let pointer = ref_str.strip_prefix("#/")?;
    let name = pointer.strip_prefix(section)?.strip_prefix('/')?;

    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(decode_pointer_segment(name))
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Rewrites schemars `#/$defs/X` pointers into schema component references.
pub(crate) fn rewrite_defs_refs(value: &mut Value, version: OpenApiVersion) -> AppResult<()> {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                let rewritten = ref_str
                    .strip_prefix(DEFS_PREFIX)
                    .map(|name| reference_path(ComponentKind::Schema, version, name))
                    .transpose()?;
                if let Some(rewritten) = rewritten {
                    *ref_str = rewritten;
                }
            }
            for v in obj.values_mut() {
                rewrite_defs_refs(v, version)?;
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                rewrite_defs_refs(v, version)?;
            }
        }
        _ => {}
    }
    Ok(())
}
