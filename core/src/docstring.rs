#![deny(missing_docs)]

//! # Docstring Specs
//!
//! Reads operation specs from handler documentation. The text before the first
//! `---` line is the summary; everything from that line on is YAML:
//!
//! ```text
//! Find a pet.
//! ---
//! get:
//!   responses:
//!     200:
//!       description: the pet
//! ```

use crate::error::{AppError, AppResult};
use serde_json::{Map, Number, Value};

const YAML_SEPARATOR: &str = "---";

/// Normalizes docstring indentation.
///
/// The first line keeps no indentation, the common indentation of the other
/// lines is removed, and leading/trailing blank lines are dropped.
pub fn trim_docstring(docstring: &str) -> String {
    let expanded = docstring.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut trimmed = vec![first.trim().to_string()];
    trimmed.extend(rest.iter().map(|line| {
        line.get(indent..)
            .unwrap_or_else(|| line.trim_start())
            .trim_end()
            .to_string()
    }));

    while trimmed.last().is_some_and(|line| line.is_empty()) {
        trimmed.pop();
    }
    let start = trimmed
        .iter()
        .position(|line| !line.is_empty())
        .unwrap_or(trimmed.len());

    trimmed[start..].join("\n")
}

/// Removes the whitespace prefix shared by every non-blank line.
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(|common, prefix| {
            let shared = common
                .char_indices()
                .zip(prefix.chars())
                .take_while(|((_, a), b)| a == b)
                .map(|((i, a), _)| i + a.len_utf8())
                .last()
                .unwrap_or(0);
            &common[..shared]
        })
        .unwrap_or("");

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(indent).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses the YAML section of a docstring.
///
/// A docstring without a `---` line yields an empty map. YAML that is not a
/// mapping is `AppError::InvalidDocstring`.
pub fn load_yaml_from_docstring(docstring: &str) -> AppResult<Map<String, Value>> {
    let trimmed = trim_docstring(docstring);
    let lines: Vec<&str> = trimmed.lines().collect();

    let Some(cut_from) = lines
        .iter()
        .position(|line| line.trim().starts_with(YAML_SEPARATOR))
    else {
        return Ok(Map::new());
    };

    let yaml = dedent(&lines[cut_from..].join("\n"));
    let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml)?;

    match yaml_to_json(parsed)? {
        Value::Object(specs) => Ok(specs),
        Value::Null => Ok(Map::new()),
        other => Err(AppError::InvalidDocstring(format!(
            "expected a mapping, found {}",
            other
        ))),
    }
}

/// Reads the specs of a docstring: its YAML plus a `summary` taken from the
/// text before the separator when the YAML sets none.
pub fn load_specs_from_docstring(docstring: &str) -> AppResult<Map<String, Value>> {
    if docstring.trim().is_empty() {
        return Ok(Map::new());
    }

    let mut specs = load_yaml_from_docstring(docstring)?;
    let summary = docstring
        .split(YAML_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();
    if !summary.is_empty() && !specs.contains_key("summary") {
        specs.insert("summary".into(), Value::String(summary.to_string()));
    }

    Ok(specs)
}

/// Docstring specs overlaid with `specs`; explicit entries win.
pub fn spec_from(docstring: Option<&str>, specs: Map<String, Value>) -> AppResult<Map<String, Value>> {
    let mut merged = match docstring {
        Some(doc) => load_specs_from_docstring(doc)?,
        None => Map::new(),
    };
    merged.extend(specs);
    Ok(merged)
}

/// Converts parsed YAML into a JSON value.
///
/// Scalar mapping keys become strings, so `200:` is the status code `"200"`.
/// Tags are dropped in favour of the tagged value.
pub fn yaml_to_json(value: serde_yaml::Value) -> AppResult<Value> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| AppError::InvalidDocstring(format!("unsupported number {}", n)))?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<AppResult<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> AppResult<String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(AppError::InvalidDocstring(format!(
            "mapping keys must be scalars, found {:?}",
            other
        ))),
    }
}
