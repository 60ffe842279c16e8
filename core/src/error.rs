//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.
//!
//! Every failure is synchronous and in-memory; nothing here is retried.
//! Errors propagate to the top-level spec-build call, which aborts
//! document generation.

use crate::oas::ComponentKind;
use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// A named model reference was never registered.
    #[from(ignore)]
    #[display(
        "Model with name {_0:?} was not found. You may need to declare or register the model before building the spec."
    )]
    Lookup(String),

    /// A value in schema position is neither a schema object nor a model reference.
    #[from(ignore)]
    #[display(
        "Schema resolver returned nothing for schema {_0}. Either the schema was not registered or it is not a model reference."
    )]
    SchemaResolution(String),

    /// The component table already holds an entry under this id.
    #[from(ignore)]
    #[display("Another {kind} component with name {id:?} is already registered.")]
    DuplicateComponent {
        /// The component section.
        kind: ComponentKind,
        /// The colliding component id.
        id: String,
    },

    /// The OpenAPI version string is malformed or out of the supported range.
    #[from(ignore)]
    #[display("Not a valid OpenAPI version number: {_0}")]
    InvalidVersion(String),

    /// A parameter object is malformed or cannot be expanded.
    #[from(ignore)]
    #[display("Invalid parameter: {_0}")]
    InvalidParameter(String),

    /// Two parameters of one operation share a name and location.
    #[from(ignore)]
    #[display("Duplicate parameter with name {name} and location {location}")]
    DuplicateParameter {
        /// Parameter name.
        name: String,
        /// Parameter location (`in`).
        location: String,
    },

    /// A docstring carries YAML that is not an operation mapping.
    #[from(ignore)]
    #[display("Invalid docstring specs: {_0}")]
    InvalidDocstring(String),

    /// No route in the route table serves the requested endpoint.
    #[from(ignore)]
    #[display("Could not find endpoint for view {_0:?}")]
    RouteNotFound(String),

    /// A path was registered without a path string and no plugin supplied one.
    #[from(ignore)]
    #[display("Path template is not specified.")]
    MissingPath,

    /// Wrapper for YAML parsing errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_lookup_message_mentions_registration() {
        let err = AppError::Lookup("Ghost".into());
        let msg = err.to_string();
        assert!(msg.contains("\"Ghost\""));
        assert!(msg.contains("register"));
    }

    #[test]
    fn test_duplicate_component_display() {
        let err = AppError::DuplicateComponent {
            kind: ComponentKind::Schema,
            id: "Pet".into(),
        };
        assert_eq!(
            err.to_string(),
            "Another schema component with name \"Pet\" is already registered."
        );
    }

    #[test]
    fn test_yaml_conversion() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let app_err: AppError = yaml_err.into();
        assert!(matches!(app_err, AppError::Yaml(_)));
    }
}
