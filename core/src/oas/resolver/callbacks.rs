#![deny(missing_docs)]

//! # Operation and Callback Resolution
//!
//! Operation Objects, Path Items and Callback Objects.
//!
//! A callback maps an event name to runtime-expression paths, each a Path
//! Item with nested operations, which may declare callbacks of their own.
//! Recursion is bounded by the depth of the document.

use crate::error::AppResult;
use crate::oas::resolver::SchemaResolver;
use serde_json::{Map, Value};

/// Path Item keys holding Operation Objects.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Returns `true` if `key` names an operation of a Path Item.
pub fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.contains(&key)
}

impl SchemaResolver<'_> {
    /// Resolves parameters, responses and (OAS3) callbacks and request body of
    /// an Operation Object.
    pub fn resolve_operation(&mut self, operation: &Value) -> AppResult<Value> {
        let Some(operation) = operation.as_object() else {
            return Ok(operation.clone());
        };
        let mut resolved = operation.clone();

        if let Some(Value::Array(parameters)) = operation.get("parameters") {
            resolved.insert("parameters".into(), Value::Array(self.resolve_parameters(parameters)?));
        }

        if let Some(Value::Object(responses)) = operation.get("responses") {
            let mut resolved_responses = Map::with_capacity(responses.len());
            for (status, response) in responses {
                resolved_responses.insert(status.clone(), self.resolve_response(response)?);
            }
            resolved.insert("responses".into(), Value::Object(resolved_responses));
        }

        if !self.version().is_v2() {
            if let Some(callbacks) = operation.get("callbacks") {
                resolved.insert("callbacks".into(), self.resolve_callbacks(callbacks)?);
            }
            if let Some(body) = operation.get("requestBody") {
                resolved.insert("requestBody".into(), self.resolve_request_body(body)?);
            }
        }

        Ok(Value::Object(resolved))
    }

    /// Resolves every operation and the shared `parameters` of a Path Item.
    pub fn resolve_path_item(&mut self, item: &Map<String, Value>) -> AppResult<Map<String, Value>> {
        let mut resolved = Map::with_capacity(item.len());

        for (key, value) in item {
            let value = match (key.as_str(), value) {
                (method, operation) if is_http_method(method) => self.resolve_operation(operation)?,
                ("parameters", Value::Array(parameters)) => {
                    Value::Array(self.resolve_parameters(parameters)?)
                }
                _ => value.clone(),
            };
            resolved.insert(key.clone(), value);
        }

        Ok(resolved)
    }

    /// Resolves a Callbacks map: event name -> expression -> Path Item.
    ///
    /// Reference Objects at any level are kept as is.
    pub fn resolve_callbacks(&mut self, callbacks: &Value) -> AppResult<Value> {
        let Some(callbacks) = callbacks.as_object() else {
            return Ok(callbacks.clone());
        };
        let mut resolved = Map::with_capacity(callbacks.len());

        for (event, callback) in callbacks {
            let callback = match callback {
                Value::Object(expressions) => {
                    let mut resolved_expressions = Map::with_capacity(expressions.len());
                    for (expression, item) in expressions {
                        let item = match item {
                            Value::Object(item) => Value::Object(self.resolve_path_item(item)?),
                            other => other.clone(),
                        };
                        resolved_expressions.insert(expression.clone(), item);
                    }
                    Value::Object(resolved_expressions)
                }
                other => other.clone(),
            };
            resolved.insert(event.clone(), callback);
        }

        Ok(Value::Object(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::ModelRegistry;
    use crate::oas::components::Components;
    use crate::oas::version::OpenApiVersion;
    use pretty_assertions::assert_eq;
    use schemars::JsonSchema;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Pet {
        id: i64,
        name: String,
    }

    fn registry() -> ModelRegistry {
        let registry = ModelRegistry::new();
        registry.register_type::<Pet>();
        registry
    }

    #[test]
    fn test_callback_request_body_resolved() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let operation = json!({
            "callbacks": {
                "onEvent": {
                    "/callback": {
                        "post": {
                            "requestBody": {"content": {"application/json": {"schema": "Pet"}}}
                        }
                    }
                }
            }
        });
        let resolved = resolver.resolve_operation(&operation).unwrap();

        assert_eq!(resolved, operation);
        assert!(components.schemas().contains_key("Pet"));
    }

    #[test]
    fn test_nested_callbacks_terminate() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let operation = json!({
            "callbacks": {
                "outer": {
                    "{$request.body#/url}": {
                        "post": {
                            "callbacks": {
                                "inner": {
                                    "/inner": {
                                        "put": {
                                            "responses": {
                                                "200": {"content": {"application/json": {"schema": "Pet"}}}
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "shared": {"$ref": "#/components/callbacks/Shared"}
            }
        });
        let resolved = resolver.resolve_operation(&operation).unwrap();

        assert_eq!(resolved, operation);
        assert_eq!(components.schemas().len(), 1);
    }

    #[test]
    fn test_v2_skips_request_body_and_callbacks() {
        let registry = ModelRegistry::new();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V2, &mut components);

        let operation = json!({
            "requestBody": {"content": {"application/json": {"schema": "Ghost"}}},
            "callbacks": {"e": {"/cb": {"post": {"requestBody": {"content": {"a/b": {"schema": "Ghost"}}}}}}}
        });
        assert_eq!(resolver.resolve_operation(&operation).unwrap(), operation);
    }

    #[test]
    fn test_path_item_parameters_and_methods() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let item = json!({
            "summary": "pets",
            "parameters": [{"in": "path", "schema": "Pet"}],
            "get": {"responses": {"200": {"content": {"application/json": {"schema": "Pet"}}}}}
        });
        let resolved = resolver.resolve_path_item(item.as_object().unwrap()).unwrap();

        assert_eq!(resolved["summary"], "pets");
        assert_eq!(resolved["parameters"].as_array().unwrap().len(), 2);
        assert_eq!(resolved["get"], item["get"]);
    }

    #[test]
    fn test_failure_leaves_input_untouched() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let operation = json!({
            "responses": {
                "200": {"content": {"application/json": {"schema": "Pet"}}},
                "404": {"content": {"application/json": {"schema": "Ghost"}}}
            }
        });
        let snapshot = operation.clone();
        let err = resolver.resolve_operation(&operation).unwrap_err();

        assert!(matches!(err, AppError::Lookup(_)));
        assert_eq!(operation, snapshot);
        // Registration is monotone: models seen before the failure stay registered.
        assert!(components.schemas().contains_key("Pet"));
    }
}
