#![deny(missing_docs)]

//! # apispec-plugins
//!
//! Plugins for building OpenAPI documents from data models and routes.
//!
//! `ModelPlugin` replaces model references in operations and components with
//! schemas or `$ref`s, registering models as schema components on the way.
//! `RoutePlugin` derives paths and operations from a route table.

/// Shared error types.
pub mod error;

/// Spec document configuration.
pub mod config;

/// Docstring spec loading.
pub mod docstring;

/// Data-model descriptors and the model registry.
pub mod models;

/// OpenAPI document building and schema resolution.
pub mod oas;

/// Spec document plugins.
pub mod plugins;

pub use config::SpecConfig;
pub use docstring::{load_specs_from_docstring, load_yaml_from_docstring, spec_from};
pub use error::{AppError, AppResult};
pub use models::{Field, Model, ModelRef, ModelRegistry, ModelType};
pub use oas::{
    build_reference, ApiSpec, ComponentKind, Components, OpenApiVersion, PathSpec, ResolveMode,
    SchemaResolver,
};
pub use plugins::{
    Handler, ModelPlugin, Plugin, Route, RoutePlugin, RouteTable, SpecContext, View,
};
