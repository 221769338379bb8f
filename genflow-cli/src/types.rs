//! Common argument types used across CLI modules

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// JSON argument given either inline or as `@path/to/file.json`
#[derive(Debug, Clone, PartialEq)]
pub enum JsonArg {
    Inline(String),
    File(PathBuf),
}

impl JsonArg {
    /// Parse a raw argument; a leading `@` names a file
    pub fn parse(input: &str) -> Self {
        match input.strip_prefix('@') {
            Some(path) => JsonArg::File(PathBuf::from(path)),
            None => JsonArg::Inline(input.to_string()),
        }
    }

    /// Read and parse the JSON value
    pub fn load(&self) -> Result<Value> {
        match self {
            JsonArg::Inline(text) => {
                serde_json::from_str(text).context("Argument is not valid JSON")
            }
            JsonArg::File(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("{} is not valid JSON", path.display()))
            }
        }
    }

    /// Read the value and require it to be a JSON object
    pub fn load_object(&self) -> Result<Map<String, Value>> {
        match self.load()? {
            Value::Object(map) => Ok(map),
            other => bail!("Expected a JSON object, got {}", kind_of(&other)),
        }
    }
}

impl std::fmt::Display for JsonArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonArg::Inline(text) => write!(f, "{}", text),
            JsonArg::File(path) => write!(f, "@{}", path.display()),
        }
    }
}

impl std::str::FromStr for JsonArg {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(JsonArg::parse(s))
    }
}

/// Parse a single key=value pair
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Merge `--data` JSON and `--field key=value` pairs into template values
///
/// Fields win over keys of the same name in the JSON object.
pub fn template_values(
    data: Option<&JsonArg>,
    fields: &[(String, String)],
) -> Result<Map<String, Value>> {
    let mut values = match data {
        Some(arg) => arg.load_object()?,
        None => Map::new(),
    };
    for (key, value) in fields {
        values.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(values)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
