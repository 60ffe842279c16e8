#![deny(missing_docs)]

//! # Resolver Module
//!
//! Replaces model references inside operation-document fragments with
//! component references or inline schemas.
//!
//! Handles:
//! - Model reference resolution (name, type handle, instance).
//! - Recursive schema objects (`items`, `properties`, combinators).
//! - Parameters, including exploding a model into one parameter per field.
//! - Responses, headers and request bodies, gated on the OpenAPI version.
//! - Operations and their callbacks.
//!
//! Every `resolve_*` method borrows its input and returns a rebuilt fragment,
//! so a failed resolution leaves the caller's document untouched. Components
//! registered before the failure stay registered.

pub mod body;
pub mod callbacks;
pub mod params;
pub mod responses;
pub mod schema;

use crate::error::AppResult;
use crate::models::{ModelRef, ModelRegistry, ModelType};
use crate::oas::components::Components;
use crate::oas::registrar::ComponentRegistrar;
use crate::oas::version::OpenApiVersion;
use serde_json::Value;

/// How a model reference is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Register the model as a component and point at it by name.
    ByReference,
    /// Embed the model's full schema.
    Inline,
}

/// Walks document fragments and resolves every model reference in them.
pub struct SchemaResolver<'a> {
    registry: &'a ModelRegistry,
    version: OpenApiVersion,
    registrar: ComponentRegistrar<'a>,
}

impl<'a> SchemaResolver<'a> {
    /// Creates a resolver backed by `registry` that registers into `components`.
    pub fn new(
        registry: &'a ModelRegistry,
        version: OpenApiVersion,
        components: &'a mut Components,
    ) -> Self {
        Self {
            registry,
            version,
            registrar: ComponentRegistrar::new(version, components),
        }
    }

    /// The version of the document being resolved.
    pub fn version(&self) -> OpenApiVersion {
        self.version
    }

    /// Normalizes any model reference to its canonical descriptor.
    ///
    /// Names go through the registry and fail with `AppError::Lookup` when absent.
    pub fn resolve_instance(&self, reference: &ModelRef<'_>) -> AppResult<ModelType> {
        match reference {
            ModelRef::Type(model) => Ok(model.clone()),
            ModelRef::Instance(value) => Ok(value.model_type()),
            ModelRef::Name(name) => self.registry.get(name),
        }
    }

    /// Resolves a model reference in the given mode.
    ///
    /// `ByReference` registers the model and yields its name, which the spec
    /// document later renders as a `$ref`. `Inline` yields the full schema;
    /// nested models it points at are registered as components.
    pub fn resolve_model(&mut self, reference: &ModelRef<'_>, mode: ResolveMode) -> AppResult<Value> {
        let model = self.resolve_instance(reference)?;
        tracing::trace!(model = model.name(), ?mode, "resolved model reference");

        match mode {
            ResolveMode::ByReference => {
                self.registrar.register(&model)?;
                Ok(Value::String(model.name().to_string()))
            }
            ResolveMode::Inline => self.registrar.promote_definitions(&model),
        }
    }

    /// Schema of a model about to be stored as a component by the caller.
    ///
    /// Nested definitions become sibling components; the model itself is not
    /// registered.
    pub fn resolve_component(&mut self, reference: &ModelRef<'_>) -> AppResult<Value> {
        let model = self.resolve_instance(reference)?;
        self.registrar.promote_definitions(&model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::oas::components::ComponentKind;
    use schemars::JsonSchema;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Pet {
        id: i64,
        name: String,
    }

    #[test]
    fn test_resolve_instance_all_encodings_agree() {
        let registry = ModelRegistry::new();
        registry.register_type::<Pet>();
        let mut components = Components::new();
        let resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let pet = Pet {
            id: 1,
            name: "Rex".into(),
        };
        let by_name = resolver.resolve_instance(&ModelRef::name("Pet")).unwrap();
        let by_type = resolver.resolve_instance(&ModelRef::of::<Pet>()).unwrap();
        let by_instance = resolver.resolve_instance(&ModelRef::instance(&pet)).unwrap();

        assert_eq!(by_name, by_type);
        assert_eq!(by_type, by_instance);
    }

    #[test]
    fn test_resolve_instance_type_handle_needs_no_registry() {
        let registry = ModelRegistry::new();
        let mut components = Components::new();
        let resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        assert!(resolver.resolve_instance(&ModelRef::of::<Pet>()).is_ok());
        assert!(matches!(
            resolver.resolve_instance(&ModelRef::name("Pet")),
            Err(AppError::Lookup(_))
        ));
    }

    #[test]
    fn test_inline_mode_is_model_schema() {
        let registry = ModelRegistry::new();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        let inline = resolver
            .resolve_model(&ModelRef::of::<Pet>(), ResolveMode::Inline)
            .unwrap();

        assert_eq!(inline, ModelType::of::<Pet>().schema());
        assert!(components.schemas().is_empty());
    }

    #[test]
    fn test_reference_mode_registers_once() {
        let registry = ModelRegistry::new();
        registry.register_type::<Pet>();
        let mut components = Components::new();
        let mut resolver = SchemaResolver::new(&registry, OpenApiVersion::V3_1, &mut components);

        for _ in 0..4 {
            let reference = resolver
                .resolve_model(&ModelRef::name("Pet"), ResolveMode::ByReference)
                .unwrap();
            assert_eq!(reference, Value::String("Pet".into()));
        }

        assert_eq!(components.schemas().len(), 1);
        assert_eq!(
            components.get(ComponentKind::Schema, "Pet"),
            Some(&ModelType::of::<Pet>().schema())
        );
    }
}
