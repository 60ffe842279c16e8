#![deny(missing_docs)]

//! # OpenAPI Document Module
//!
//! - **version**: OpenAPI version parsing and gating.
//! - **components**: The component table.
//! - **document**: `ApiSpec`, the spec document with plugin dispatch.
//! - **ref_utils**: `$ref` pointer building and parsing.
//! - **refs**: Rendering component names into Reference Objects.
//! - **registrar**: Registering models as schema components.
//! - **resolver**: Resolving model references inside fragments.

pub mod components;
pub mod document;
pub mod ref_utils;
pub mod refs;
pub mod registrar;
pub mod resolver;
pub mod version;

pub use components::{ComponentKind, Components};
pub use document::{ApiSpec, PathSpec};
pub use ref_utils::{build_reference, extract_component_name, reference_path};
pub use refs::RefRenderer;
pub use registrar::ComponentRegistrar;
pub use resolver::{ResolveMode, SchemaResolver};
pub use version::OpenApiVersion;
