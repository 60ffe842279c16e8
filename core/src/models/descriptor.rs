#![deny(missing_docs)]

//! # Model Descriptors
//!
//! `ModelType` is the canonical handle for a data-model type. The schema body
//! itself is produced by `schemars`; this module only keeps the name, the
//! generated definition and enough identity to tell two types apart.

use schemars::JsonSchema;
use serde_json::{Map, Value};
use std::any::TypeId;
use std::sync::Arc;

/// A named, schema-producing description of a data-model type.
///
/// Cloning is cheap: the generated schema is shared.
#[derive(Debug, Clone)]
pub struct ModelType {
    inner: Arc<ModelTypeInner>,
}

#[derive(Debug)]
struct ModelTypeInner {
    name: String,
    type_id: Option<TypeId>,
    schema: Value,
}

/// A top-level field of a model, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Property name as it appears in the schema.
    pub name: String,
    /// The field's own schema.
    pub schema: Value,
    /// Whether the model lists the field as required (it has no default).
    pub required: bool,
}

impl ModelType {
    /// Builds the descriptor of a Rust type deriving `JsonSchema`.
    ///
    /// The `$schema` dialect marker is dropped since the definition is embedded
    /// into an OpenAPI document.
    pub fn of<T: JsonSchema + 'static>() -> Self {
        let mut schema = schemars::schema_for!(T).to_value();
        if let Some(obj) = schema.as_object_mut() {
            obj.retain(|key, _| key != "$schema");
        }

        Self {
            inner: Arc::new(ModelTypeInner {
                name: T::schema_name().into_owned(),
                type_id: Some(TypeId::of::<T>()),
                schema,
            }),
        }
    }

    /// Builds a descriptor from an already generated schema.
    ///
    /// Used for models described outside of Rust (e.g. loaded from a file).
    pub fn from_schema(name: impl Into<String>, schema: Value) -> Self {
        Self {
            inner: Arc::new(ModelTypeInner {
                name: name.into(),
                type_id: None,
                schema,
            }),
        }
    }

    /// The stable unique name, used as the component id.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The full schema definition.
    pub fn schema(&self) -> Value {
        self.inner.schema.clone()
    }

    /// Borrowed access to the schema definition.
    pub fn schema_ref(&self) -> &Value {
        &self.inner.schema
    }

    /// Returns `true` when this descriptor was built from `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.type_id == Some(TypeId::of::<T>())
    }

    /// Top-level fields in declaration order.
    ///
    /// Returns `None` when the schema has no `properties` mapping.
    pub fn fields(&self) -> Option<Vec<Field>> {
        fields_of(&self.inner.schema)
    }
}

/// Top-level fields of an object schema, in declaration order.
pub(crate) fn fields_of(schema: &Value) -> Option<Vec<Field>> {
    let obj = schema.as_object()?;
    let properties = obj.get("properties")?.as_object()?;
    let required = required_names(obj);

    Some(
        properties
            .iter()
            .map(|(name, schema)| Field {
                name: name.clone(),
                schema: schema.clone(),
                required: required.iter().any(|r| r == name),
            })
            .collect(),
    )
}

fn required_names(obj: &Map<String, Value>) -> Vec<&str> {
    obj.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.name == other.inner.name
                && self.inner.type_id == other.inner.type_id
                && self.inner.schema == other.inner.schema)
    }
}

/// A live value governed by a model type.
///
/// Implemented for every `JsonSchema` type, so any model instance can stand in
/// for its type in a `ModelRef`.
pub trait Model {
    /// The descriptor of the value's type.
    fn model_type(&self) -> ModelType;
}

impl<T: JsonSchema + 'static> Model for T {
    fn model_type(&self) -> ModelType {
        ModelType::of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Pet {
        id: i64,
        name: String,
        tag: Option<String>,
    }

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Owner {
        name: String,
    }

    #[test]
    fn test_of_uses_schemars_name() {
        let pet = ModelType::of::<Pet>();
        assert_eq!(pet.name(), "Pet");
        assert!(pet.schema_ref().get("$schema").is_none());
        assert_eq!(pet.schema_ref()["type"], "object");
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let fields = ModelType::of::<Pet>().fields().unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "tag"]);
        assert!(fields[0].required);
        assert!(fields[1].required);
        assert!(!fields[2].required);
        assert_eq!(fields[1].schema, json!({"type": "string"}));
    }

    #[test]
    fn test_optional_field_schema_is_type_list() {
        let fields = ModelType::of::<Pet>().fields().unwrap();
        assert_eq!(fields[2].schema, json!({"type": ["string", "null"]}));
    }

    #[test]
    fn test_fields_absent_without_properties() {
        let model = ModelType::from_schema("Color", json!({"type": "string", "enum": ["red"]}));
        assert!(model.fields().is_none());
    }

    #[test]
    fn test_type_identity() {
        let pet = ModelType::of::<Pet>();
        assert!(pet.is::<Pet>());
        assert!(!pet.is::<Owner>());
        assert_eq!(pet, ModelType::of::<Pet>());
        assert_ne!(pet, ModelType::of::<Owner>());
    }

    #[test]
    fn test_instance_yields_descriptor() {
        let owner = Owner { name: "Ann".into() };
        let model = (&owner as &dyn Model).model_type();
        assert!(model.is::<Owner>());
    }

    #[test]
    fn test_external_descriptor_has_no_type() {
        let model = ModelType::from_schema("Pet", ModelType::of::<Pet>().schema());
        assert!(!model.is::<Pet>());
        assert_ne!(model, ModelType::of::<Pet>());
    }
}
