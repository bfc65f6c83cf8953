//! Connection settings and secret handling.
//!
//! Settings are populated by an ordered fallback: explicit CLI flag, then
//! environment variable, then a hard-coded default. There is no ambient
//! global state; one [`VaultSettings`] value is built per invocation.

mod secret;
mod settings;

pub use secret::SecretString;
pub use settings::{AuthMethod, VaultSettings};

use std::path::Path;

use crate::errors::{Result, VaultsmithError};

/// Load a desired-state payload from a local JSON file.
///
/// The file must contain a single JSON object. A missing or unparsable
/// file is a fatal configuration error, reported before any remote call
/// is attempted.
pub fn load_config_object(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| VaultsmithError::io(e, format!("failed to read config file {}", path.display())))?;

    let value: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
        VaultsmithError::config(format!("config file {} is not valid JSON: {}", path.display(), e))
    })?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(VaultsmithError::config(format!(
            "config file {} must contain a JSON object, got {}",
            path.display(),
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
