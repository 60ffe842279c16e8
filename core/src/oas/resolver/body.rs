#![deny(missing_docs)]

//! # Body Resolution
//!
//! Media-type maps (`content`) and Request Body Objects. Both are OAS3-only
//! constructs; every media-type schema is resolved by reference.

use crate::error::AppResult;
use crate::oas::resolver::{ResolveMode, SchemaResolver};
use serde_json::{Map, Value};

impl SchemaResolver<'_> {
    /// Resolves the `schema` of every media type in a `content` map.
    pub fn resolve_content(&mut self, content: &Map<String, Value>) -> AppResult<Map<String, Value>> {
        let mut resolved = Map::with_capacity(content.len());

        for (media_type, media) in content {
            let media = match media {
                Value::Object(media) => {
                    let mut media = media.clone();
                    if let Some(schema) = media.get("schema") {
                        let schema = self.resolve_schema(schema, ResolveMode::ByReference)?;
                        media.insert("schema".into(), schema);
                    }
                    Value::Object(media)
                }
                other => other.clone(),
            };
            resolved.insert(media_type.clone(), media);
        }

        Ok(resolved)
    }

    /// Resolves a Request Body Object the way a response's content is resolved.
    pub fn resolve_request_body(&mut self, body: &Value) -> AppResult<Value> {
        let Some(body) = body.as_object() else {
            return Ok(body.clone());
        };
        let mut resolved = body.clone();

        if let Some(Value::Object(content)) = body.get("content") {
            resolved.insert("content".into(), Value::Object(self.resolve_content(content)?));
        }

        Ok(Value::Object(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelRegistry;
    use crate::oas::components::Components;
    use crate::oas::version::OpenApiVersion;
    use schemars::JsonSchema;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Pet {
        name: String,
    }

    #[test]
    fn test_request_body_by_reference() {
        let registry = ModelRegistry::new();
        registry.register_type::<Pet>();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let body = json!({
            "required": true,
            "content": {
                "application/json": {"schema": "Pet"},
                "application/xml": {"schema": {"type": "array", "items": "Pet"}},
                "text/plain": {}
            }
        });
        let resolved = resolver.resolve_request_body(&body).unwrap();

        assert_eq!(resolved, body);
        assert_eq!(components.schemas().len(), 1);
    }

    #[test]
    fn test_request_body_reference_object_untouched() {
        let registry = ModelRegistry::new();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let body = json!({"$ref": "#/components/requestBodies/Pet"});
        assert_eq!(resolver.resolve_request_body(&body).unwrap(), body);
    }
}
