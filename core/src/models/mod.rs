#![deny(missing_docs)]

//! # Data Models
//!
//! The data-model side of schema resolution.
//!
//! - **descriptor**: `ModelType`, the named type descriptor that produces a schema.
//! - **reference**: `ModelRef`, the three encodings of a model reference.
//! - **registry**: `ModelRegistry`, the name to descriptor lookup table.

pub mod descriptor;
pub mod reference;
pub mod registry;

pub use descriptor::{Field, Model, ModelType};
pub use reference::ModelRef;
pub use registry::ModelRegistry;
