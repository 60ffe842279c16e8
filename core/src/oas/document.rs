#![deny(missing_docs)]

//! # Spec Document
//!
//! `ApiSpec` collects components and paths and dispatches to plugins while
//! doing so. Every registration runs the matching plugin hooks, then renders
//! leftover component names into `$ref` objects, then stores the result.

use crate::config::SpecConfig;
use crate::error::{AppError, AppResult};
use crate::models::ModelRef;
use crate::oas::components::{ComponentKind, Components};
use crate::oas::ref_utils::extract_component_name;
use crate::oas::refs::RefRenderer;
use crate::oas::resolver::callbacks::is_http_method;
use crate::oas::version::OpenApiVersion;
use crate::plugins::{Plugin, SpecContext};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Arguments of `ApiSpec::path`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathSpec {
    /// Path template, e.g. `/pets/{id}`. May be supplied by a path hook instead.
    pub path: Option<String>,
    /// Operation Objects keyed by HTTP method.
    pub operations: Map<String, Value>,
    /// Path-level summary.
    pub summary: Option<String>,
    /// Path-level description.
    pub description: Option<String>,
    /// Parameters shared by every operation of the path.
    pub parameters: Vec<Value>,
    /// Endpoint of the view serving the path, for route plugins.
    pub view: Option<String>,
    /// Prefix stripped from paths derived from routes.
    pub base_path: Option<String>,
}

impl PathSpec {
    /// A path with no operations yet.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A path derived from the route serving `endpoint`.
    pub fn for_view(endpoint: impl Into<String>) -> Self {
        Self {
            view: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Sets the operations.
    pub fn with_operations(mut self, operations: Map<String, Value>) -> Self {
        self.operations = operations;
        self
    }

    /// Adds a path-level parameter.
    pub fn with_parameter(mut self, parameter: Value) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the path-level summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the path-level description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the base path stripped from route-derived paths.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }
}

/// A spec document under construction.
pub struct ApiSpec {
    config: SpecConfig,
    plugins: Vec<Box<dyn Plugin>>,
    components: Components,
    paths: IndexMap<String, Map<String, Value>>,
}

impl std::fmt::Debug for ApiSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSpec")
            .field("config", &self.config)
            .field("plugins", &self.plugins.len())
            .field("components", &self.components)
            .field("paths", &self.paths)
            .finish()
    }
}

impl ApiSpec {
    /// Creates an empty document.
    pub fn new(config: SpecConfig) -> Self {
        Self {
            config,
            plugins: Vec::new(),
            components: Components::new(),
            paths: IndexMap::new(),
        }
    }

    /// Registers a plugin. Hooks run in registration order.
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Version of the document format.
    pub fn openapi_version(&self) -> OpenApiVersion {
        self.config.openapi_version
    }

    /// API title.
    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// API version.
    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// The component table.
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Registered Path Items, in registration order.
    pub fn paths(&self) -> &IndexMap<String, Map<String, Value>> {
        &self.paths
    }

    /// Follows a local Reference Object into the component table.
    ///
    /// Values that are not `{"$ref": ...}` are returned as is; dangling
    /// references yield `None`.
    pub fn dereference<'v>(&'v self, value: &'v Value) -> Option<&'v Value> {
        let Some(ref_str) = value.get("$ref").and_then(Value::as_str) else {
            return Some(value);
        };
        let version = self.openapi_version();
        [
            ComponentKind::Schema,
            ComponentKind::Parameter,
            ComponentKind::Response,
            ComponentKind::Header,
        ]
        .into_iter()
        .find_map(|kind| {
            extract_component_name(ref_str, kind, version)
                .and_then(|name| self.components.get(kind, &name))
        })
    }

    fn ensure_vacant(&self, kind: ComponentKind, id: &str) -> AppResult<()> {
        if self.components.contains(kind, id) {
            return Err(AppError::DuplicateComponent {
                kind,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn store(&mut self, kind: ComponentKind, id: &str, definition: Value) -> AppResult<()> {
        self.components.add(kind, id, definition)?;
        tracing::debug!(%kind, id, "registered component");
        Ok(())
    }

    /// Adds a schema component.
    ///
    /// `model` is handed to the plugins' schema hooks, whose results are
    /// merged over `definition`.
    pub fn schema(
        &mut self,
        id: &str,
        definition: Map<String, Value>,
        model: Option<ModelRef<'_>>,
    ) -> AppResult<&mut Self> {
        self.ensure_vacant(ComponentKind::Schema, id)?;
        let version = self.openapi_version();

        let mut merged = definition.clone();
        {
            let mut cx = SpecContext {
                version,
                components: &mut self.components,
            };
            for plugin in &self.plugins {
                match plugin.schema_helper(&mut cx, id, &definition, model.as_ref())? {
                    Some(Value::Object(extra)) => merged.extend(extra),
                    Some(other) => {
                        return Err(AppError::General(format!(
                            "schema hook for {:?} returned a non-mapping schema: {}",
                            id, other
                        )))
                    }
                    None => {}
                }
            }
        }

        let mut schema = Value::Object(merged);
        RefRenderer::new(version).render_schema(&mut schema)?;
        self.store(ComponentKind::Schema, id, schema)?;
        Ok(self)
    }

    /// Adds a parameter component located `location` (`path`, `query`, ...).
    ///
    /// `name` defaults to `id`; path parameters are always required.
    pub fn parameter(&mut self, id: &str, location: &str, component: Value) -> AppResult<&mut Self> {
        self.ensure_vacant(ComponentKind::Parameter, id)?;
        let version = self.openapi_version();

        let Value::Object(mut parameter) = component else {
            return Err(AppError::InvalidParameter(format!(
                "parameter component {:?} must be a mapping",
                id
            )));
        };
        parameter
            .entry("name")
            .or_insert_with(|| Value::String(id.to_string()));
        parameter.insert("in".into(), Value::String(location.to_string()));
        if location == "path" {
            parameter.insert("required".into(), Value::Bool(true));
        }

        let mut parameter = Value::Object(parameter);
        {
            let mut cx = SpecContext {
                version,
                components: &mut self.components,
            };
            for plugin in &self.plugins {
                parameter = plugin.parameter_helper(&mut cx, parameter)?;
            }
        }

        RefRenderer::new(version).render_parameter(&mut parameter)?;
        self.store(ComponentKind::Parameter, id, parameter)?;
        Ok(self)
    }

    /// Adds a response component.
    pub fn response(&mut self, id: &str, component: Value) -> AppResult<&mut Self> {
        self.ensure_vacant(ComponentKind::Response, id)?;
        let version = self.openapi_version();

        let mut response = component;
        {
            let mut cx = SpecContext {
                version,
                components: &mut self.components,
            };
            for plugin in &self.plugins {
                response = plugin.response_helper(&mut cx, response)?;
            }
        }

        RefRenderer::new(version).render_response(&mut response)?;
        self.store(ComponentKind::Response, id, response)?;
        Ok(self)
    }

    /// Adds a header component. Swagger 2.0 documents have no header section.
    pub fn header(&mut self, id: &str, component: Value) -> AppResult<&mut Self> {
        let version = self.openapi_version();
        if ComponentKind::Header.section(version).is_none() {
            return Err(AppError::General(format!(
                "OpenAPI {} has no section for header components",
                version
            )));
        }
        self.ensure_vacant(ComponentKind::Header, id)?;

        let mut header = component;
        {
            let mut cx = SpecContext {
                version,
                components: &mut self.components,
            };
            for plugin in &self.plugins {
                header = plugin.header_helper(&mut cx, header)?;
            }
        }

        RefRenderer::new(version).render_parameter(&mut header)?;
        self.store(ComponentKind::Header, id, header)?;
        Ok(self)
    }

    /// Adds a Path Item, merging it into any existing entry for the same path.
    pub fn path(&mut self, mut spec: PathSpec) -> AppResult<&mut Self> {
        let version = self.openapi_version();
        let Self {
            plugins,
            components,
            paths,
            ..
        } = &mut *self;
        let mut cx = SpecContext {
            version,
            components,
        };

        let mut path = spec.path.take();
        for plugin in plugins.iter() {
            if let Some(derived) = plugin.path_helper(&mut cx, &mut spec)? {
                path = Some(derived);
            }
        }
        let path = path.ok_or(AppError::MissingPath)?;

        let mut item = std::mem::take(&mut spec.operations);
        if !spec.parameters.is_empty() {
            item.insert(
                "parameters".into(),
                Value::Array(std::mem::take(&mut spec.parameters)),
            );
        }
        for plugin in plugins.iter() {
            plugin.operation_helper(&mut cx, Some(&path), &mut item)?;
        }

        clean_path_item(&mut item)?;
        RefRenderer::new(version).render_path_item(&mut item)?;

        if let Some(summary) = spec.summary {
            item.insert("summary".into(), Value::String(summary));
        }
        if let Some(description) = spec.description {
            item.insert("description".into(), Value::String(description));
        }

        tracing::debug!(path = %path, operations = item.len(), "registered path");
        paths.entry(path).or_default().extend(item);
        Ok(self)
    }
}

/// Validates the parameter lists of a Path Item.
///
/// Every inline parameter needs `name` and `in`; `(name, in)` pairs are unique
/// per list; path parameters are required.
fn clean_path_item(item: &mut Map<String, Value>) -> AppResult<()> {
    for (key, value) in item.iter_mut() {
        if key == "parameters" {
            clean_parameters(value)?;
        } else if is_http_method(key) {
            if let Some(parameters) = value.get_mut("parameters") {
                clean_parameters(parameters)?;
            }
        }
    }
    Ok(())
}

fn clean_parameters(parameters: &mut Value) -> AppResult<()> {
    let Value::Array(parameters) = parameters else {
        return Ok(());
    };
    let mut seen = HashSet::new();

    for parameter in parameters.iter_mut() {
        let Value::Object(parameter) = parameter else {
            continue;
        };
        if parameter.contains_key("$ref") {
            continue;
        }

        let name = parameter.get("name").and_then(Value::as_str);
        let location = parameter.get("in").and_then(Value::as_str);
        let (Some(name), Some(location)) = (name, location) else {
            let missing: Vec<&str> = ["name", "in"]
                .into_iter()
                .filter(|key| !parameter.contains_key(*key))
                .collect();
            return Err(AppError::InvalidParameter(format!(
                "missing keys {:?} for parameter",
                missing
            )));
        };

        if !seen.insert((name.to_string(), location.to_string())) {
            return Err(AppError::DuplicateParameter {
                name: name.to_string(),
                location: location.to_string(),
            });
        }
        if location == "path" {
            parameter.insert("required".into(), Value::Bool(true));
        }
    }
    Ok(())
}
