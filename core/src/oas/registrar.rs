#![deny(missing_docs)]

//! # Component Registration
//!
//! Adds resolved models to the component table under their name.
//! Registration is idempotent: the resolver may visit the same model any
//! number of times, so a duplicate id is treated as "already present".
//!
//! If two distinct models collide on one id, the first definition is kept and
//! a warning is logged.

use crate::error::{AppError, AppResult};
use crate::models::ModelType;
use crate::oas::components::{ComponentKind, Components};
use crate::oas::ref_utils::rewrite_defs_refs;
use crate::oas::version::OpenApiVersion;
use serde_json::Value;

/// Registers model schemas as schema components.
pub struct ComponentRegistrar<'a> {
    version: OpenApiVersion,
    components: &'a mut Components,
}

impl<'a> ComponentRegistrar<'a> {
    /// Creates a registrar writing into `components`.
    pub fn new(version: OpenApiVersion, components: &'a mut Components) -> Self {
        Self {
            version,
            components,
        }
    }

    /// Registers `model` under its name. Duplicate ids are not an error.
    ///
    /// Nested definitions generated by schemars (`$defs`) are promoted to
    /// sibling schema components and the pointers to them are rewritten.
    pub fn register(&mut self, model: &ModelType) -> AppResult<()> {
        let schema = self.promote_definitions(model)?;
        self.add_schema(model.name(), schema)
    }

    /// Registers the nested definitions of `model` and returns its schema
    /// with `$defs` removed and pointers rewritten, without registering the
    /// model itself.
    pub fn promote_definitions(&mut self, model: &ModelType) -> AppResult<Value> {
        let mut schema = model.schema();

        let defs = schema.as_object_mut().and_then(|obj| {
            let defs = obj.get("$defs").and_then(Value::as_object).cloned();
            obj.retain(|key, _| key != "$defs");
            defs
        });
        if let Some(defs) = defs {
            for (name, mut definition) in defs {
                rewrite_defs_refs(&mut definition, self.version)?;
                self.add_schema(&name, definition)?;
            }
            rewrite_defs_refs(&mut schema, self.version)?;
        }

        Ok(schema)
    }

    fn add_schema(&mut self, id: &str, schema: Value) -> AppResult<()> {
        let conflicting = self
            .components
            .get(ComponentKind::Schema, id)
            .map(|existing| existing != &schema);

        match self.components.add(ComponentKind::Schema, id, schema) {
            Ok(()) => {
                tracing::debug!(component = id, "registered schema component");
                Ok(())
            }
            Err(AppError::DuplicateComponent { .. }) => {
                if conflicting == Some(true) {
                    tracing::warn!(
                        component = id,
                        "schema component already registered with a different definition; keeping the first"
                    );
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
