#![deny(missing_docs)]

//! # Reference Rendering
//!
//! Turns component names left in a fragment into Reference Objects before the
//! fragment is stored in the document.
//!
//! A string in schema position names a schema component. A string standing in
//! for a parameter, response or header names a component of that kind.

use crate::error::AppResult;
use crate::oas::components::ComponentKind;
use crate::oas::ref_utils::build_reference;
use crate::oas::resolver::callbacks::is_http_method;
use crate::oas::version::OpenApiVersion;
use serde_json::Value;

/// Renders component names into `$ref` objects for one document version.
#[derive(Debug, Clone, Copy)]
pub struct RefRenderer {
    version: OpenApiVersion,
}

impl RefRenderer {
    /// Creates a renderer for `version`.
    pub fn new(version: OpenApiVersion) -> Self {
        Self { version }
    }

    fn get_ref(&self, kind: ComponentKind, value: &mut Value) -> AppResult<()> {
        if let Value::String(name) = value {
            *value = build_reference(kind, self.version, name)?;
        }
        Ok(())
    }

    /// Renders a Schema Object and everything nested in it.
    pub fn render_schema(&self, schema: &mut Value) -> AppResult<()> {
        if schema.is_string() {
            return self.get_ref(ComponentKind::Schema, schema);
        }
        let Some(obj) = schema.as_object_mut() else {
            return Ok(());
        };

        if let Some(items) = obj.get_mut("items") {
            self.render_schema(items)?;
        }
        if let Some(Value::Object(properties)) = obj.get_mut("properties") {
            for property in properties.values_mut() {
                self.render_schema(property)?;
            }
        }
        if let Some(additional) = obj.get_mut("additionalProperties") {
            self.render_schema(additional)?;
        }
        for key in ["oneOf", "anyOf", "allOf"] {
            if let Some(Value::Array(members)) = obj.get_mut(key) {
                for member in members.iter_mut() {
                    self.render_schema(member)?;
                }
            }
        }
        if let Some(not) = obj.get_mut("not") {
            self.render_schema(not)?;
        }
        Ok(())
    }

    fn render_content(&self, holder: &mut Value) -> AppResult<()> {
        if let Some(Value::Object(content)) = holder.get_mut("content") {
            for media in content.values_mut() {
                if let Some(schema) = media.get_mut("schema") {
                    self.render_schema(schema)?;
                }
            }
        }
        Ok(())
    }

    /// Renders a Parameter or Header Object (`schema` and `content`).
    pub fn render_parameter(&self, parameter: &mut Value) -> AppResult<()> {
        if let Some(schema) = parameter.get_mut("schema") {
            self.render_schema(schema)?;
        }
        self.render_content(parameter)
    }

    /// Renders a Response Object, its headers and its schemas.
    pub fn render_response(&self, response: &mut Value) -> AppResult<()> {
        if let Some(schema) = response.get_mut("schema") {
            self.render_schema(schema)?;
        }
        if let Some(Value::Object(headers)) = response.get_mut("headers") {
            for header in headers.values_mut() {
                self.get_ref(ComponentKind::Header, header)?;
                self.render_parameter(header)?;
            }
        }
        self.render_content(response)
    }

    fn render_parameters(&self, parameters: &mut Value) -> AppResult<()> {
        if let Value::Array(parameters) = parameters {
            for parameter in parameters.iter_mut() {
                self.get_ref(ComponentKind::Parameter, parameter)?;
                self.render_parameter(parameter)?;
            }
        }
        Ok(())
    }

    /// Renders an Operation Object.
    pub fn render_operation(&self, operation: &mut Value) -> AppResult<()> {
        let Some(obj) = operation.as_object_mut() else {
            return Ok(());
        };

        if let Some(parameters) = obj.get_mut("parameters") {
            self.render_parameters(parameters)?;
        }
        if let Some(Value::Object(responses)) = obj.get_mut("responses") {
            for response in responses.values_mut() {
                self.get_ref(ComponentKind::Response, response)?;
                self.render_response(response)?;
            }
        }
        if !self.version.is_v2() {
            if let Some(body) = obj.get_mut("requestBody") {
                self.render_content(body)?;
            }
            if let Some(Value::Object(callbacks)) = obj.get_mut("callbacks") {
                for callback in callbacks.values_mut() {
                    let Some(expressions) = callback.as_object_mut() else {
                        continue;
                    };
                    for item in expressions.values_mut() {
                        if let Some(item) = item.as_object_mut() {
                            self.render_path_item(item)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Renders every operation and the shared `parameters` of a Path Item.
    pub fn render_path_item(&self, item: &mut serde_json::Map<String, Value>) -> AppResult<()> {
        for (key, value) in item.iter_mut() {
            if is_http_method(key) {
                self.render_operation(value)?;
            } else if key == "parameters" {
                self.render_parameters(value)?;
            }
        }
        Ok(())
    }
}
