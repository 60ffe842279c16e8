#![deny(missing_docs)]

//! # Route Plugin
//!
//! Derives paths and operations from an application's route table.
//!
//! A route binds an endpoint name and a URL rule (`/pets/<int:id>`) to a
//! view. Function views document every method in one set of specs; method
//! views document each HTTP method with its own handler.

use crate::docstring::{load_specs_from_docstring, spec_from};
use crate::error::{AppError, AppResult};
use crate::oas::PathSpec;
use crate::plugins::{Plugin, SpecContext};
use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// A documented request handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handler {
    doc: Option<String>,
    specs: Option<Map<String, Value>>,
}

impl Handler {
    /// An undocumented handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the handler's docstring.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Attaches explicit specs, merged over those of the docstring.
    pub fn with_specs(mut self, specs: Map<String, Value>) -> Self {
        self.specs = Some(specs);
        self
    }

    /// Resolved specs of the handler.
    pub fn specs(&self) -> AppResult<Map<String, Value>> {
        match (&self.specs, self.doc.as_deref()) {
            (Some(specs), doc) => spec_from(doc, specs.clone()),
            (None, Some(doc)) => load_specs_from_docstring(doc),
            (None, None) => Ok(Map::new()),
        }
    }
}

/// What serves a route.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// One handler for every method.
    Function(Handler),
    /// One handler per lower-case HTTP method.
    Methods(IndexMap<String, Handler>),
}

/// A URL rule bound to an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Endpoint name, unique per table.
    pub endpoint: String,
    /// URL rule, e.g. `/pets/<int:id>`.
    pub rule: String,
    /// Upper-case HTTP methods the route accepts.
    pub methods: Vec<String>,
    /// The view serving the route.
    pub view: View,
}

impl Route {
    /// A function view accepting `GET`.
    pub fn function(endpoint: impl Into<String>, rule: impl Into<String>, handler: Handler) -> Self {
        Self {
            endpoint: endpoint.into(),
            rule: rule.into(),
            methods: vec!["GET".to_string()],
            view: View::Function(handler),
        }
    }

    /// A method view accepting exactly the methods it has handlers for.
    pub fn method_view<M, I>(endpoint: impl Into<String>, rule: impl Into<String>, handlers: I) -> Self
    where
        M: Into<String>,
        I: IntoIterator<Item = (M, Handler)>,
    {
        let handlers: IndexMap<String, Handler> = handlers
            .into_iter()
            .map(|(method, handler)| (method.into().to_lowercase(), handler))
            .collect();
        Self {
            endpoint: endpoint.into(),
            rule: rule.into(),
            methods: handlers.keys().map(|m| m.to_uppercase()).collect(),
            view: View::Methods(handlers),
        }
    }

    /// Replaces the accepted methods.
    pub fn with_methods<M: Into<String>>(mut self, methods: impl IntoIterator<Item = M>) -> Self {
        self.methods = methods.into_iter().map(|m| m.into().to_uppercase()).collect();
        self
    }

    /// The rule as an OpenAPI path template: `<int:id>` becomes `{id}`.
    pub fn path(&self) -> String {
        rule_to_path(&self.rule)
    }
}

/// Routes of an application, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route.
    pub fn with_route(mut self, route: Route) -> Self {
        self.add(route);
        self
    }

    /// Adds a route.
    pub fn add(&mut self, route: Route) -> &mut Self {
        self.routes.push(route);
        self
    }

    /// The first route registered for `endpoint`.
    pub fn find(&self, endpoint: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.endpoint == endpoint)
    }
}

/// Converts a URL rule into a path template.
///
/// e.g. `/pets/<int:pet_id>/<name>` -> `/pets/{pet_id}/{name}`
pub fn rule_to_path(rule: &str) -> String {
    static RULE_ARG_RE: OnceLock<Regex> = OnceLock::new();
    let rule_arg_re = RULE_ARG_RE
        .get_or_init(|| Regex::new(r"<(?:[^:<>]+:)?([^<>]+)>").expect("Invalid regex"));

    rule_arg_re
        .replace_all(rule, |caps: &Captures| format!("{{{}}}", &caps[1]))
        .into_owned()
}

/// Fills `PathSpec`s that name a view from a route table.
#[derive(Debug, Clone, Default)]
pub struct RoutePlugin {
    routes: RouteTable,
}

impl RoutePlugin {
    /// Creates a plugin serving `routes`.
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }
}

impl Plugin for RoutePlugin {
    fn path_helper(&self, _cx: &mut SpecContext<'_>, spec: &mut PathSpec) -> AppResult<Option<String>> {
        let Some(endpoint) = spec.view.as_deref() else {
            return Ok(None);
        };
        let route = self
            .routes
            .find(endpoint)
            .ok_or_else(|| AppError::RouteNotFound(endpoint.to_string()))?;

        match &route.view {
            View::Methods(handlers) => {
                for method in &route.methods {
                    let method = method.to_lowercase();
                    if let Some(handler) = handlers.get(&method) {
                        spec.operations.insert(method, Value::Object(handler.specs()?));
                    }
                }
            }
            View::Function(handler) => spec.operations.extend(handler.specs()?),
        }

        let path = route.path();
        let path = match spec.base_path.as_deref() {
            Some(base) => path.strip_prefix(base).map(str::to_string).unwrap_or(path),
            None => path,
        };

        tracing::debug!(endpoint = %route.endpoint, path = %path, "derived path from route");
        Ok(Some(path))
    }
}
