//! Argument validation against a tool's declared JSON Schema.
//!
//! Covers the subset the travel tools declare: an object with `properties`,
//! `required`, primitive `type`s and a numeric `minimum`. Unknown keywords are
//! ignored.

use serde_json::Value;

/// Checks `args` against `schema`. Returns a human-readable reason on mismatch.
pub fn validate_arguments(schema: &Value, args: &Value) -> Result<(), String> {
    if schema.get("type").and_then(Value::as_str) != Some("object") {
        return Ok(());
    }
    let obj = args
        .as_object()
        .ok_or_else(|| format!("arguments must be an object, got {}", json_type(args)))?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !obj.contains_key(field) {
                return Err(format!("missing required argument `{}`", field));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };
    for (name, value) in obj {
        let Some(prop) = properties.get(name) else {
            continue;
        };
        if let Some(expected) = prop.get("type").and_then(Value::as_str) {
            if !matches_type(expected, value) {
                return Err(format!(
                    "argument `{}` must be {}, got {}",
                    name,
                    expected,
                    json_type(value)
                ));
            }
        }
        if let (Some(min), Some(n)) = (prop.get("minimum").and_then(Value::as_f64), value.as_f64())
        {
            if n < min {
                return Err(format!("argument `{}` must be >= {}", name, min));
            }
        }
    }
    Ok(())
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
