#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Parameter Objects carrying a model reference.
//!
//! Inside an operation, `schema: <Model>` expands into one parameter per
//! top-level model field. A standalone parameter (a component) keeps its
//! cardinality and gets the model's schema inline. `content` schemas and the
//! schema of an `in: body` parameter are always resolved by reference.

use crate::error::{AppError, AppResult};
use crate::models::descriptor::fields_of;
use crate::models::ModelRef;
use crate::oas::resolver::{ResolveMode, SchemaResolver};
use serde_json::{Map, Value};

impl SchemaResolver<'_> {
    /// Resolves an operation's parameter list, exploding model parameters.
    ///
    /// Entries that are not mappings (e.g. component names) are kept as is.
    pub fn resolve_parameters(&mut self, parameters: &[Value]) -> AppResult<Vec<Value>> {
        let mut resolved = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            let model = parameter
                .as_object()
                .filter(|param| !is_body(param))
                .and_then(|param| param.get("schema").map(|schema| (param, schema)))
                .and_then(|(param, schema)| ModelRef::from_value(schema).map(|r| (param, r)));

            match model {
                Some((param, reference)) => {
                    resolved.extend(self.explode_parameter(param, &reference)?);
                }
                None => resolved.push(self.resolve_parameter(parameter)?),
            }
        }

        Ok(resolved)
    }

    /// Resolves a single parameter without changing its cardinality.
    ///
    /// A bare `schema` is resolved inline, except on a body parameter;
    /// `content` schemas by reference.
    pub fn resolve_parameter(&mut self, parameter: &Value) -> AppResult<Value> {
        let Some(param) = parameter.as_object() else {
            return Ok(parameter.clone());
        };
        let mut resolved = param.clone();

        if let Some(schema) = param.get("schema") {
            let mode = if is_body(param) {
                ResolveMode::ByReference
            } else {
                ResolveMode::Inline
            };
            resolved.insert("schema".into(), self.resolve_schema(schema, mode)?);
        }
        if let Some(Value::Object(content)) = param.get("content") {
            resolved.insert("content".into(), Value::Object(self.resolve_content(content)?));
        }

        Ok(Value::Object(resolved))
    }

    /// Expands a model parameter into one parameter per model field, in
    /// declaration order. Every other key of the original parameter is copied.
    fn explode_parameter(
        &mut self,
        parameter: &Map<String, Value>,
        reference: &ModelRef<'_>,
    ) -> AppResult<Vec<Value>> {
        let model = self.resolve_instance(reference)?;
        let schema = self.registrar.promote_definitions(&model)?;
        let fields = fields_of(&schema).ok_or_else(|| {
            AppError::InvalidParameter(format!(
                "model {:?} has no properties to expand into parameters",
                model.name()
            ))
        })?;

        let base: Map<String, Value> = parameter
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "name" | "schema" | "required"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut exploded = Vec::with_capacity(fields.len());
        for field in fields {
            let mut param = base.clone();
            param.insert("name".into(), Value::String(field.name));
            param.insert(
                "schema".into(),
                self.resolve_schema(&field.schema, ResolveMode::Inline)?,
            );
            param.insert("required".into(), Value::Bool(field.required));
            exploded.push(Value::Object(param));
        }

        tracing::trace!(model = model.name(), count = exploded.len(), "exploded parameter");
        Ok(exploded)
    }
}

/// OAS 2 request payload, which carries a whole model in one parameter.
fn is_body(param: &Map<String, Value>) -> bool {
    param.get("in").and_then(Value::as_str) == Some("body")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelRegistry, ModelType};
    use crate::oas::components::Components;
    use crate::oas::version::OpenApiVersion;
    use pretty_assertions::assert_eq;
    use schemars::JsonSchema;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct PetPath {
        id: i64,
        name: String,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Paging {
        limit: Option<u32>,
        cursor: String,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Owner {
        name: String,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Query {
        owner: Owner,
        limit: Option<u32>,
    }

    fn registry() -> ModelRegistry {
        let registry = ModelRegistry::new();
        registry.register_type::<PetPath>();
        registry.register_type::<Paging>();
        registry.register_type::<Query>();
        registry
    }

    #[test]
    fn test_explode_model_parameter() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V2, &mut components);

        let params = resolver
            .resolve_parameters(&[json!({"in": "path", "schema": "PetPath"})])
            .unwrap();

        assert_eq!(
            params,
            vec![
                json!({"in": "path", "name": "id", "schema": {"type": "integer", "format": "int64"}, "required": true}),
                json!({"in": "path", "name": "name", "schema": {"type": "string"}, "required": true}),
            ]
        );
        assert!(components.schemas().is_empty());
    }

    #[test]
    fn test_explode_keeps_extra_keys_and_required_flags() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let params = resolver
            .resolve_parameters(&[
                json!({"in": "query", "description": "paging", "schema": "Paging"}),
                json!({"in": "header", "name": "X-Trace", "schema": {"type": "string"}}),
            ])
            .unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params[0]["name"], "limit");
        assert_eq!(params[0]["required"], false);
        assert_eq!(params[0]["description"], "paging");
        assert_eq!(params[1]["name"], "cursor");
        assert_eq!(params[1]["required"], true);
        assert_eq!(params[2], json!({"in": "header", "name": "X-Trace", "schema": {"type": "string"}}));
    }

    #[test]
    fn test_explode_nested_model_field_points_at_component() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V2, &mut components);

        let params = resolver
            .resolve_parameters(&[json!({"in": "query", "schema": "Query"})])
            .unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["name"], "owner");
        assert_eq!(params[0]["schema"], json!({"$ref": "#/definitions/Owner"}));
        assert_eq!(params[0]["required"], true);
        assert_eq!(params[1]["name"], "limit");
        assert_eq!(params[1]["required"], false);
        assert!(!params.iter().any(|p| p.to_string().contains("$defs")));
        assert_eq!(
            components.schemas()["Owner"]["properties"],
            json!({"name": {"type": "string"}})
        );
        assert!(!components.schemas().contains_key("Query"));
    }

    #[test]
    fn test_body_parameter_is_not_exploded() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V2, &mut components);

        let body = json!({"in": "body", "name": "body", "required": true, "schema": "PetPath"});
        let params = resolver.resolve_parameters(std::slice::from_ref(&body)).unwrap();

        assert_eq!(params, vec![body.clone()]);
        assert_eq!(resolver.resolve_parameter(&body).unwrap(), body);
        assert_eq!(
            components.schemas()["PetPath"],
            ModelType::of::<PetPath>().schema()
        );
    }

    #[test]
    fn test_content_parameter_by_reference() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let param = json!({
            "in": "query",
            "name": "pet",
            "content": {"application/json": {"schema": "PetPath"}}
        });
        let params = resolver.resolve_parameters(std::slice::from_ref(&param)).unwrap();

        assert_eq!(params, vec![param]);
        assert!(components.schemas().contains_key("PetPath"));
    }

    #[test]
    fn test_component_parameter_inline() {
        let registry = registry();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let param = resolver
            .resolve_parameter(&json!({"in": "path", "name": "pet", "schema": "PetPath"}))
            .unwrap();

        assert_eq!(param["schema"], ModelType::of::<PetPath>().schema());
        assert!(components.schemas().is_empty());
    }

    #[test]
    fn test_explode_requires_properties() {
        let registry = ModelRegistry::new();
        registry.register(ModelType::from_schema("Color", json!({"type": "string"})));
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let err = resolver
            .resolve_parameters(&[json!({"in": "query", "schema": "Color"})])
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(_)));
    }

    #[test]
    fn test_reference_parameters_pass_through() {
        let registry = ModelRegistry::new();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let params = resolver.resolve_parameters(&[json!("Limit")]).unwrap();
        assert_eq!(params, vec![json!("Limit")]);
    }
}
