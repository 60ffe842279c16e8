#![deny(missing_docs)]

//! # Response Resolution
//!
//! Response and Header Objects.
//!
//! Swagger 2.0 responses carry a bare `schema`. OAS3 responses carry a
//! `content` map plus `headers`, whose schemas are always inlined.

use crate::error::AppResult;
use crate::oas::resolver::{ResolveMode, SchemaResolver};
use serde_json::{Map, Value};

impl SchemaResolver<'_> {
    /// Resolves a Response Object according to the document version.
    ///
    /// Non-mapping responses (component names) are returned unchanged.
    pub fn resolve_response(&mut self, response: &Value) -> AppResult<Value> {
        let Some(response) = response.as_object() else {
            return Ok(response.clone());
        };
        let mut resolved = response.clone();

        if self.version().is_v2() {
            if let Some(schema) = response.get("schema") {
                resolved.insert("schema".into(), self.resolve_schema(schema, ResolveMode::ByReference)?);
            }
            return Ok(Value::Object(resolved));
        }

        if let Some(Value::Object(headers)) = response.get("headers") {
            let mut resolved_headers = Map::with_capacity(headers.len());
            for (name, header) in headers {
                resolved_headers.insert(name.clone(), self.resolve_header(header)?);
            }
            resolved.insert("headers".into(), Value::Object(resolved_headers));
        }
        if let Some(Value::Object(content)) = response.get("content") {
            resolved.insert("content".into(), Value::Object(self.resolve_content(content)?));
        }

        Ok(Value::Object(resolved))
    }

    /// Resolves a Header Object; its `schema` is always inlined.
    pub fn resolve_header(&mut self, header: &Value) -> AppResult<Value> {
        let Some(header) = header.as_object() else {
            return Ok(header.clone());
        };
        let mut resolved = header.clone();

        if let Some(schema) = header.get("schema") {
            resolved.insert("schema".into(), self.resolve_schema(schema, ResolveMode::Inline)?);
        }

        Ok(Value::Object(resolved))
    }
}
