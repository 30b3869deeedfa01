use serde_json::{Map, Value};

/// Parses a raw argument payload and checks it against a tool's declared
/// parameter schema.
///
/// Covers the subset of JSON Schema tools declare in practice: an object
/// root, `required` keys, primitive `type` per property (single or a list)
/// and `enum`. Keys without a declared property are passed through.
pub fn parse_arguments(schema: &Value, raw: &str) -> Result<Value, String> {
    let raw = raw.trim();
    let value: Value = if raw.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON arguments: {e}"))?
    };

    if !expects_object(schema) {
        return Ok(value);
    }

    let args = value
        .as_object()
        .ok_or_else(|| format!("expected a JSON object, got {}", type_name(&value)))?;

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for key in required.iter().filter_map(Value::as_str) {
            match args.get(key) {
                None | Some(Value::Null) => {
                    return Err(format!("missing required field '{key}'"));
                }
                Some(_) => {}
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (key, property) in properties {
            if let Some(field) = args.get(key) {
                check_field(key, property, field)?;
            }
        }
    }

    Ok(value)
}

fn expects_object(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("object")
        || schema.get("properties").is_some()
}

fn check_field(key: &str, property: &Value, field: &Value) -> Result<(), String> {
    let allowed: Vec<&str> = match property.get("type") {
        Some(Value::String(kind)) => vec![kind.as_str()],
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).collect(),
        _ => vec![],
    };

    if !allowed.is_empty() && !allowed.iter().any(|kind| matches_type(kind, field)) {
        return Err(format!(
            "field '{key}' must be {}, got {}",
            describe_kinds(&allowed),
            type_name(field)
        ));
    }

    if let Some(options) = property.get("enum").and_then(Value::as_array)
        && !options.contains(field)
    {
        let rendered: Vec<String> = options.iter().map(Value::to_string).collect();
        return Err(format!(
            "field '{key}' must be one of [{}], got {field}",
            rendered.join(", ")
        ));
    }

    Ok(())
}

fn matches_type(kind: &str, value: &Value) -> bool {
    match kind {
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn describe_kinds(kinds: &[&str]) -> String {
    let described: Vec<String> = kinds
        .iter()
        .map(|kind| match *kind {
            "integer" | "object" | "array" => format!("an {kind}"),
            "null" => "null".to_string(),
            other => format!("a {other}"),
        })
        .collect();
    described.join(" or ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calculator_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {"type": "string", "enum": ["add", "multiply"]},
                "a": {"type": "number"},
                "b": {"type": "number"}
            },
            "required": ["operation", "a", "b"]
        })
    }

    #[test]
    fn accepts_valid_arguments() {
        let args = parse_arguments(
            &calculator_schema(),
            r#"{"operation":"multiply","a":25,"b":13}"#,
        )
        .unwrap();
        assert_eq!(args["a"], json!(25));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_arguments(&calculator_schema(), "{\"a\":").unwrap_err();
        assert!(err.starts_with("invalid JSON arguments"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = parse_arguments(&calculator_schema(), r#"{"operation":"add","a":1}"#)
            .unwrap_err();
        assert_eq!(err, "missing required field 'b'");
    }

    #[test]
    fn rejects_non_numeric_value() {
        let err = parse_arguments(
            &calculator_schema(),
            r#"{"operation":"add","a":"twenty-five","b":13}"#,
        )
        .unwrap_err();
        assert_eq!(err, "field 'a' must be a number, got string");
    }

    #[test]
    fn rejects_value_outside_enum() {
        let err = parse_arguments(
            &calculator_schema(),
            r#"{"operation":"modulo","a":1,"b":2}"#,
        )
        .unwrap_err();
        assert!(err.contains("must be one of"));
    }

    #[test]
    fn rejects_non_object_payload() {
        let err = parse_arguments(&calculator_schema(), "[1, 2]").unwrap_err();
        assert_eq!(err, "expected a JSON object, got array");
    }

    #[test]
    fn empty_payload_is_an_empty_object() {
        let schema = json!({"type": "object", "properties": {}});
        assert_eq!(parse_arguments(&schema, "  ").unwrap(), json!({}));
    }

    #[test]
    fn integer_rejects_fractional_numbers() {
        let schema = json!({"type": "object", "properties": {"n": {"type": "integer"}}});
        assert!(parse_arguments(&schema, r#"{"n": 3}"#).is_ok());
        assert_eq!(
            parse_arguments(&schema, r#"{"n": 3.5}"#).unwrap_err(),
            "field 'n' must be an integer, got number"
        );
    }
}
