#![deny(missing_docs)]

//! # Model Registry
//!
//! Maps model names to their descriptors so documents can refer to models by
//! name. Insert-once: the first descriptor registered under a name wins and
//! later registrations are ignored. Nothing is ever removed.

use crate::error::{AppError, AppResult};
use crate::models::descriptor::ModelType;
use indexmap::IndexMap;
use parking_lot::RwLock;
use schemars::JsonSchema;
use std::sync::{Arc, OnceLock};

/// Name to descriptor lookup table.
///
/// Reads take a shared lock; registration takes the write lock, so concurrent
/// spec builds may share one registry.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<IndexMap<String, ModelType>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default registry.
    ///
    /// Convenient for declaration sites that cannot thread a registry through;
    /// prefer an explicit instance everywhere else.
    pub fn global() -> Arc<ModelRegistry> {
        static GLOBAL: OnceLock<Arc<ModelRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(ModelRegistry::new())).clone()
    }

    /// Registers `model` under its name unless the name is already taken.
    ///
    /// Returns `true` when the descriptor was inserted.
    pub fn register(&self, model: ModelType) -> bool {
        let mut models = self.models.write();
        if models.contains_key(model.name()) {
            tracing::trace!(model = model.name(), "model already registered");
            return false;
        }
        tracing::debug!(model = model.name(), "registering model");
        models.insert(model.name().to_string(), model);
        true
    }

    /// Declares the Rust type `T` and returns the canonical descriptor for its name.
    pub fn register_type<T: JsonSchema + 'static>(&self) -> ModelType {
        let model = ModelType::of::<T>();
        let mut models = self.models.write();
        models
            .entry(model.name().to_string())
            .or_insert_with(|| {
                tracing::debug!(model = model.name(), "registering model");
                model
            })
            .clone()
    }

    /// Looks up a descriptor by name.
    pub fn get(&self, name: &str) -> AppResult<ModelType> {
        self.models
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::Lookup(name.to_string()))
    }

    /// Returns `true` if a model is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.models.read().contains_key(name)
    }

    /// A snapshot of every registered descriptor, in registration order.
    pub fn all(&self) -> IndexMap<String, ModelType> {
        self.models.read().clone()
    }
}
