#![deny(missing_docs)]

//! # Plugins
//!
//! Defines the `Plugin` trait: the hook points `ApiSpec` calls while a spec
//! document is being built. Implementations:
//! - `ModelPlugin`: resolves data-model references into schemas.
//! - `RoutePlugin`: derives paths and operations from a route table.

pub mod models;
pub mod routes;

use crate::error::AppResult;
use crate::models::ModelRef;
use crate::oas::{Components, OpenApiVersion, PathSpec};
use serde_json::{Map, Value};

pub use models::ModelPlugin;
pub use routes::{Handler, Route, RoutePlugin, RouteTable, View};

/// State of the spec document handed to every hook.
#[derive(Debug)]
pub struct SpecContext<'a> {
    /// Version of the document being built.
    pub version: OpenApiVersion,
    /// Component table hooks may register into.
    pub components: &'a mut Components,
}

/// Hooks a spec document dispatches to while it is being built.
///
/// Every hook has a pass-through default, so a plugin implements only the
/// ones it needs. Hooks run in plugin registration order.
pub trait Plugin: Send + Sync {
    /// Called for `ApiSpec::schema`.
    ///
    /// A returned mapping is merged over the caller's definition.
    fn schema_helper(
        &self,
        _cx: &mut SpecContext<'_>,
        _name: &str,
        _definition: &Map<String, Value>,
        _model: Option<&ModelRef<'_>>,
    ) -> AppResult<Option<Value>> {
        Ok(None)
    }

    /// Called for `ApiSpec::parameter`; returns the parameter to store.
    fn parameter_helper(&self, _cx: &mut SpecContext<'_>, parameter: Value) -> AppResult<Value> {
        Ok(parameter)
    }

    /// Called for `ApiSpec::response`; returns the response to store.
    fn response_helper(&self, _cx: &mut SpecContext<'_>, response: Value) -> AppResult<Value> {
        Ok(response)
    }

    /// Called for `ApiSpec::header`; returns the header to store.
    fn header_helper(&self, _cx: &mut SpecContext<'_>, header: Value) -> AppResult<Value> {
        Ok(header)
    }

    /// Called first for `ApiSpec::path`.
    ///
    /// May add operations to `path`. A returned string replaces the path.
    fn path_helper(&self, _cx: &mut SpecContext<'_>, _path: &mut PathSpec) -> AppResult<Option<String>> {
        Ok(None)
    }

    /// Called for `ApiSpec::path` once every path hook has run.
    ///
    /// `operations` maps HTTP methods to Operation Objects, plus the
    /// path-level `parameters` when given.
    fn operation_helper(
        &self,
        _cx: &mut SpecContext<'_>,
        _path: Option<&str>,
        _operations: &mut Map<String, Value>,
    ) -> AppResult<()> {
        Ok(())
    }
}
