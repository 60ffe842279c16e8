#![deny(missing_docs)]

//! # OpenAPI Version
//!
//! The document version gates OAS2 vs OAS3 behaviour (bare response schemas vs
//! `content` maps, `definitions` vs `components/schemas`).

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A parsed `openapi` / `swagger` version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "VersionRepr")]
pub struct OpenApiVersion {
    /// Major version (2 or 3).
    pub major: u64,
    /// Minor version.
    pub minor: u64,
    /// Patch version.
    pub patch: u64,
}

impl OpenApiVersion {
    /// Swagger 2.0.
    pub const V2: OpenApiVersion = OpenApiVersion::new(2, 0, 0);
    /// OpenAPI 3.0.3.
    pub const V3_0: OpenApiVersion = OpenApiVersion::new(3, 0, 3);
    /// OpenAPI 3.1.0.
    pub const V3_1: OpenApiVersion = OpenApiVersion::new(3, 1, 0);

    /// Creates a version from its parts.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses `"2.0"`, `"3.0.3"`, `"3.1.0"` and the like.
    ///
    /// Accepted range is `2.0` inclusive to `4.0` exclusive.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let invalid = || AppError::InvalidVersion(raw.to_string());

        let mut parts = raw.trim().split('.');
        let mut next = |required: bool| -> AppResult<u64> {
            match parts.next() {
                Some(part) => part.parse::<u64>().map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(0),
            }
        };

        let major = next(true)?;
        let minor = next(true)?;
        let patch = next(false)?;
        if parts.next().is_some() || !(2..4).contains(&major) {
            return Err(invalid());
        }

        Ok(Self::new(major, minor, patch))
    }

    /// Returns `true` for Swagger 2.x documents.
    pub fn is_v2(&self) -> bool {
        self.major < 3
    }
}

impl FromStr for OpenApiVersion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// YAML reads an unquoted `2.0` as a float.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionRepr {
    Text(String),
    Number(f64),
}

impl TryFrom<VersionRepr> for OpenApiVersion {
    type Error = AppError;

    fn try_from(value: VersionRepr) -> Result<Self, Self::Error> {
        match value {
            VersionRepr::Text(raw) => Self::parse(&raw),
            VersionRepr::Number(raw) => Self::parse(&format!("{:?}", raw)),
        }
    }
}

impl fmt::Display for OpenApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.major == 2 && self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        assert_eq!(OpenApiVersion::parse("2.0").unwrap(), OpenApiVersion::V2);
        assert_eq!(OpenApiVersion::parse("3.0.3").unwrap(), OpenApiVersion::V3_0);
        assert_eq!(OpenApiVersion::parse("3.1.0").unwrap(), OpenApiVersion::V3_1);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        for raw in ["1.2", "4.0.0", "3", "three.0", "3.0.0.1", ""] {
            assert!(
                matches!(OpenApiVersion::parse(raw), Err(AppError::InvalidVersion(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_text_and_number() {
        let text: OpenApiVersion = serde_yaml::from_str("\"3.0.3\"").unwrap();
        let number: OpenApiVersion = serde_yaml::from_str("2.0").unwrap();
        assert_eq!(text, OpenApiVersion::V3_0);
        assert_eq!(number, OpenApiVersion::V2);
    }

    #[test]
    fn test_gate_and_display() {
        assert!(OpenApiVersion::V2.is_v2());
        assert!(!OpenApiVersion::V3_1.is_v2());
        assert_eq!(OpenApiVersion::V2.to_string(), "2.0");
        assert_eq!(OpenApiVersion::V3_1.to_string(), "3.1.0");
    }
}
