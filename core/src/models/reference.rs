#![deny(missing_docs)]

//! # Model References
//!
//! A model reference names a data-model type in one of three ways. Document
//! fragments only ever carry the `Name` form (a JSON string); the type-handle
//! and instance forms come in through the Rust API.

use crate::models::descriptor::{Model, ModelType};
use schemars::JsonSchema;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// A value standing for a data-model type.
pub enum ModelRef<'a> {
    /// A model name, looked up in the registry.
    Name(Cow<'a, str>),
    /// A type descriptor handle.
    Type(ModelType),
    /// A live instance of a model type.
    Instance(&'a dyn Model),
}

impl<'a> ModelRef<'a> {
    /// A reference by name.
    pub fn name(name: impl Into<Cow<'a, str>>) -> Self {
        Self::Name(name.into())
    }

    /// A reference to the Rust type `T`.
    pub fn of<T: JsonSchema + 'static>() -> Self {
        Self::Type(ModelType::of::<T>())
    }

    /// A reference to the type of `value`.
    pub fn instance(value: &'a dyn Model) -> Self {
        Self::Instance(value)
    }

    /// Classifies a fragment value.
    ///
    /// Strings are model names; every other JSON value is not a reference.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self::Name(Cow::Borrowed(name))),
            _ => None,
        }
    }
}

impl From<ModelType> for ModelRef<'static> {
    fn from(model: ModelType) -> Self {
        Self::Type(model)
    }
}

impl<'a> From<&'a str> for ModelRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl fmt::Debug for ModelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "ModelRef::Name({:?})", name),
            Self::Type(model) => write!(f, "ModelRef::Type({:?})", model.name()),
            Self::Instance(value) => {
                write!(f, "ModelRef::Instance({:?})", value.model_type().name())
            }
        }
    }
}

impl fmt::Display for ModelRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{:?}", name),
            Self::Type(model) => write!(f, "{:?}", model.name()),
            Self::Instance(value) => write!(f, "{:?}", value.model_type().name()),
        }
    }
}
