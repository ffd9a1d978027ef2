//! Helpers to build JSON schemas for structured output

use serde_json::{Value, json};

/// Object schema with the given properties
///
/// Every listed property is required and no extra keys are allowed, which is
/// what strict structured-output modes expect.
///
/// # Example
///
/// ```
/// use agent_llm::schema;
/// use serde_json::json;
///
/// let schema = schema::object(
///     json!({
///         "ticker": schema::string("Ticker symbol"),
///         "run_news": schema::boolean("Run news analysis"),
///     }),
///     vec!["ticker", "run_news"],
/// );
/// assert_eq!(schema["additionalProperties"], false);
/// ```
pub fn object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// String property schema
pub fn string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description,
    })
}

/// Boolean property schema
pub fn boolean(description: &str) -> Value {
    json!({
        "type": "boolean",
        "description": description,
    })
}

/// Check `value` against the required keys and primitive property types of `schema`
///
/// Only the subset of JSON Schema produced by this module is understood.
pub fn conforms(schema: &Value, value: &Value) -> std::result::Result<(), String> {
    let Some(object) = value.as_object() else {
        return Err("expected a JSON object".to_string());
    };

    if let Some(required) = schema["required"].as_array() {
        for key in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(key) {
                return Err(format!("missing required field '{key}'"));
            }
        }
    }

    if let Some(properties) = schema["properties"].as_object() {
        for (key, property) in properties {
            let Some(field) = object.get(key) else {
                continue;
            };
            let ok = match property["type"].as_str() {
                Some("string") => field.is_string(),
                Some("boolean") => field.is_boolean(),
                Some("number") => field.is_number(),
                Some("object") => field.is_object(),
                _ => true,
            };
            if !ok {
                return Err(format!(
                    "field '{key}' should be of type {}",
                    property["type"]
                ));
            }
        }
    }

    Ok(())
}
