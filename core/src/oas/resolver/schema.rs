#![deny(missing_docs)]

//! # Schema Resolution
//!
//! Recursive resolution of Schema Objects. A mapping is a literal schema and is
//! walked structurally; a string is a model reference; boolean schemas pass
//! through. Anything else in schema position is a resolution error.

use crate::error::{AppError, AppResult};
use crate::models::ModelRef;
use crate::oas::resolver::{ResolveMode, SchemaResolver};
use serde_json::{Map, Value};

const COMBINATORS: [&str; 3] = ["oneOf", "anyOf", "allOf"];

impl SchemaResolver<'_> {
    /// Resolves a value in schema position.
    pub fn resolve_schema(&mut self, value: &Value, mode: ResolveMode) -> AppResult<Value> {
        match value {
            Value::Object(schema) => self.resolve_schema_object(schema, mode).map(Value::Object),
            Value::Bool(_) => Ok(value.clone()),
            other => match ModelRef::from_value(other) {
                Some(reference) => self.resolve_model(&reference, mode),
                None => Err(AppError::SchemaResolution(other.to_string())),
            },
        }
    }

    fn resolve_schema_object(
        &mut self,
        schema: &Map<String, Value>,
        mode: ResolveMode,
    ) -> AppResult<Map<String, Value>> {
        let mut resolved = schema.clone();

        if has_type(schema, "array") {
            if let Some(items) = schema.get("items") {
                resolved.insert("items".into(), self.resolve_schema(items, mode)?);
            }
        }

        if has_type(schema, "object") {
            if let Some(Value::Object(properties)) = schema.get("properties") {
                let mut props = Map::with_capacity(properties.len());
                for (name, property) in properties {
                    props.insert(name.clone(), self.resolve_schema(property, mode)?);
                }
                resolved.insert("properties".into(), Value::Object(props));
            }

            if let Some(additional) = schema.get("additionalProperties") {
                if additional.is_object() || additional.is_string() {
                    resolved.insert(
                        "additionalProperties".into(),
                        self.resolve_schema(additional, mode)?,
                    );
                }
            }
        }

        for key in COMBINATORS {
            if let Some(Value::Array(members)) = schema.get(key) {
                let members = members
                    .iter()
                    .map(|member| self.resolve_schema(member, mode))
                    .collect::<AppResult<Vec<_>>>()?;
                resolved.insert(key.into(), Value::Array(members));
            }
        }

        if let Some(not) = schema.get("not") {
            resolved.insert("not".into(), self.resolve_schema(not, mode)?);
        }

        Ok(resolved)
    }
}

/// `type` may be a single name or, since OAS 3.1, a list of names.
fn has_type(schema: &Map<String, Value>, name: &str) -> bool {
    match schema.get("type") {
        Some(Value::String(ty)) => ty == name,
        Some(Value::Array(types)) => types.iter().any(|ty| ty.as_str() == Some(name)),
        _ => false,
    }
}
