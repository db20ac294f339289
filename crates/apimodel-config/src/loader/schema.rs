//! Schema validation for model-build JSON5 layers.
//!
//! Runs before serde decoding so unknown keys and type mismatches are
//! reported with the layer label and the dotted path of the field.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "api_versions", "model"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("api_versions") {
        validate_string_array(value, layer, "api_versions")?;
    }
    if let Some(value) = map.get("model") {
        validate_model(value, layer, "model")?;
    }
    Ok(())
}

/// Validate the "model" block.
fn validate_model(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let allowed = ["namespace", "container", "key_suffix"];
    ensure_allowed_keys(map, &allowed, layer, path)?;
    for key in allowed {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(items) = value else {
        return Err(invalid(layer, path, "expected an array of strings"));
    };
    for (idx, item) in items.iter().enumerate() {
        expect_string(item, layer, &format!("{path}[{idx}]"))?;
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| invalid(layer, path, "expected an object"))
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid(layer, path, "expected a string"))
    }
}

fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid(
                layer,
                &join_path(path, key),
                &format!("unknown key `{key}`"),
            ));
        }
    }
    Ok(())
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn invalid(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "<root>" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
