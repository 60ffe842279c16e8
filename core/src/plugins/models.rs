#![deny(missing_docs)]

//! # Model Plugin
//!
//! Connects the schema resolver to the spec document's hooks. Model
//! references found in components and operations are replaced by inline
//! schemas or registered as schema components, depending on where they appear.

use crate::error::AppResult;
use crate::models::{ModelRef, ModelRegistry};
use crate::oas::resolver::{ResolveMode, SchemaResolver};
use crate::plugins::{Plugin, SpecContext};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Resolves data-model references while a spec document is built.
#[derive(Debug, Clone)]
pub struct ModelPlugin {
    registry: Arc<ModelRegistry>,
}

impl Default for ModelPlugin {
    /// A plugin backed by `ModelRegistry::global()`.
    fn default() -> Self {
        Self::new(ModelRegistry::global())
    }
}

impl ModelPlugin {
    /// Creates a plugin looking names up in `registry`.
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    fn resolver<'a>(&'a self, cx: &'a mut SpecContext<'_>) -> SchemaResolver<'a> {
        SchemaResolver::new(&self.registry, cx.version, cx.components)
    }
}

impl Plugin for ModelPlugin {
    /// With a model, returns the model's schema. Without one, registers every
    /// model named inside `definition` and leaves the definition as is.
    fn schema_helper(
        &self,
        cx: &mut SpecContext<'_>,
        _name: &str,
        definition: &Map<String, Value>,
        model: Option<&ModelRef<'_>>,
    ) -> AppResult<Option<Value>> {
        let mut resolver = self.resolver(cx);
        match model {
            Some(model) => resolver.resolve_component(model).map(Some),
            None => {
                resolver.resolve_schema(&Value::Object(definition.clone()), ResolveMode::ByReference)?;
                Ok(None)
            }
        }
    }

    fn parameter_helper(&self, cx: &mut SpecContext<'_>, parameter: Value) -> AppResult<Value> {
        self.resolver(cx).resolve_parameter(&parameter)
    }

    fn response_helper(&self, cx: &mut SpecContext<'_>, response: Value) -> AppResult<Value> {
        self.resolver(cx).resolve_response(&response)
    }

    fn header_helper(&self, cx: &mut SpecContext<'_>, header: Value) -> AppResult<Value> {
        self.resolver(cx).resolve_header(&header)
    }

    fn operation_helper(
        &self,
        cx: &mut SpecContext<'_>,
        _path: Option<&str>,
        operations: &mut Map<String, Value>,
    ) -> AppResult<()> {
        let resolved = self.resolver(cx).resolve_path_item(operations)?;
        *operations = resolved;
        Ok(())
    }
}
