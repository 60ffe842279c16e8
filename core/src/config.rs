#![deny(missing_docs)]

//! # Spec Configuration
//!
//! Top-level settings of a spec document, built in code or read from YAML:
//!
//! ```yaml
//! title: Swagger Petstore
//! version: "1.0.0"
//! openapi_version: "3.1.0"
//! ```

use crate::error::AppResult;
use crate::oas::OpenApiVersion;
use serde::Deserialize;

/// Settings of one spec document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpecConfig {
    /// API title (`info.title`).
    pub title: String,
    /// API version (`info.version`).
    pub version: String,
    /// Version of the OpenAPI document format.
    pub openapi_version: OpenApiVersion,
    /// API description (`info.description`).
    #[serde(default)]
    pub description: Option<String>,
}

impl SpecConfig {
    /// Creates a configuration without a description.
    pub fn new(
        title: impl Into<String>,
        version: impl Into<String>,
        openapi_version: OpenApiVersion,
    ) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            openapi_version,
            description: None,
        }
    }

    /// Sets the API description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reads a configuration from a YAML document.
    pub fn from_yaml(yaml: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
