#![deny(missing_docs)]

//! # Component Table
//!
//! Reusable definitions of the spec document, keyed by kind and id.
//! The table is append-only; a second `add` under an existing id fails with
//! `AppError::DuplicateComponent`.

use crate::error::{AppError, AppResult};
use crate::oas::version::OpenApiVersion;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Sections of the component table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Schema objects.
    Schema,
    /// Response objects.
    Response,
    /// Parameter objects.
    Parameter,
    /// Header objects.
    Header,
}

impl ComponentKind {
    /// The JSON pointer of the section holding this kind, without the leading `#/`.
    ///
    /// Swagger 2.0 has no header section.
    pub fn section(self, version: OpenApiVersion) -> Option<&'static str> {
        if version.is_v2() {
            match self {
                Self::Schema => Some("definitions"),
                Self::Response => Some("responses"),
                Self::Parameter => Some("parameters"),
                Self::Header => None,
            }
        } else {
            match self {
                Self::Schema => Some("components/schemas"),
                Self::Response => Some("components/responses"),
                Self::Parameter => Some("components/parameters"),
                Self::Header => Some("components/headers"),
            }
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Schema => "schema",
            Self::Response => "response",
            Self::Parameter => "parameter",
            Self::Header => "header",
        };
        f.write_str(name)
    }
}

/// Component definitions of one spec document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    schemas: IndexMap<String, Value>,
    responses: IndexMap<String, Value>,
    parameters: IndexMap<String, Value>,
    headers: IndexMap<String, Value>,
}

impl Components {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition; fails if the id is already present for that kind.
    pub fn add(&mut self, kind: ComponentKind, id: &str, definition: Value) -> AppResult<()> {
        let table = self.table_mut(kind);
        if table.contains_key(id) {
            return Err(AppError::DuplicateComponent {
                kind,
                id: id.to_string(),
            });
        }
        table.insert(id.to_string(), definition);
        Ok(())
    }

    /// Looks up a definition.
    pub fn get(&self, kind: ComponentKind, id: &str) -> Option<&Value> {
        self.table(kind).get(id)
    }

    /// Returns `true` if `id` is registered for `kind`.
    pub fn contains(&self, kind: ComponentKind, id: &str) -> bool {
        self.table(kind).contains_key(id)
    }

    /// All definitions of one kind, in registration order.
    pub fn table(&self, kind: ComponentKind) -> &IndexMap<String, Value> {
        match kind {
            ComponentKind::Schema => &self.schemas,
            ComponentKind::Response => &self.responses,
            ComponentKind::Parameter => &self.parameters,
            ComponentKind::Header => &self.headers,
        }
    }

    fn table_mut(&mut self, kind: ComponentKind) -> &mut IndexMap<String, Value> {
        match kind {
            ComponentKind::Schema => &mut self.schemas,
            ComponentKind::Response => &mut self.responses,
            ComponentKind::Parameter => &mut self.parameters,
            ComponentKind::Header => &mut self.headers,
        }
    }

    /// Schema components.
    pub fn schemas(&self) -> &IndexMap<String, Value> {
        &self.schemas
    }

    /// Response components.
    pub fn responses(&self) -> &IndexMap<String, Value> {
        &self.responses
    }

    /// Parameter components.
    pub fn parameters(&self) -> &IndexMap<String, Value> {
        &self.parameters
    }

    /// Header components.
    pub fn headers(&self) -> &IndexMap<String, Value> {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_and_get() {
        let mut components = Components::new();
        components
            .add(ComponentKind::Schema, "Pet", json!({"type": "object"}))
            .unwrap();

        assert!(components.contains(ComponentKind::Schema, "Pet"));
        assert!(!components.contains(ComponentKind::Response, "Pet"));
        assert_eq!(
            components.get(ComponentKind::Schema, "Pet"),
            Some(&json!({"type": "object"}))
        );
    }

    #[test]
    fn test_duplicate_id_rejected_even_with_equal_content() {
        let mut components = Components::new();
        components
            .add(ComponentKind::Header, "X-Rate", json!({"schema": {"type": "integer"}}))
            .unwrap();
        let err = components
            .add(ComponentKind::Header, "X-Rate", json!({"schema": {"type": "integer"}}))
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::DuplicateComponent { kind: ComponentKind::Header, ref id } if id == "X-Rate"
        ));
        assert_eq!(components.headers().len(), 1);
    }

    #[test]
    fn test_sections_by_version() {
        assert_eq!(
            ComponentKind::Schema.section(OpenApiVersion::V2),
            Some("definitions")
        );
        assert_eq!(
            ComponentKind::Schema.section(OpenApiVersion::V3_1),
            Some("components/schemas")
        );
        assert_eq!(ComponentKind::Header.section(OpenApiVersion::V2), None);
    }
}
