//! Typed access to the JSON arguments of a tool call.
//!
//! Runtimes are loose about types, so numbers and booleans sent as strings
//! are accepted too.

use serde_json::Value;

use super::ToolExecutionError;

fn invalid(key: &str, expected: &str) -> ToolExecutionError {
    ToolExecutionError::ArgumentParsingError(format!("'{key}' must be {expected}"))
}

fn present<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| !v.is_null())
}

pub fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolExecutionError> {
    match present(args, key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(invalid(key, "a string")),
        None => Err(ToolExecutionError::ArgumentParsingError(format!(
            "Missing '{key}' argument"
        ))),
    }
}

pub fn optional_str<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>, ToolExecutionError> {
    match present(args, key) {
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(invalid(key, "a string")),
        None => Ok(None),
    }
}

pub fn string_or(args: &Value, key: &str, default: &str) -> Result<String, ToolExecutionError> {
    Ok(optional_str(args, key)?.unwrap_or(default).to_string())
}

/// A string argument that may also arrive as a JSON object or array,
/// which is re-serialized.
pub fn json_text(args: &Value, key: &str) -> Result<String, ToolExecutionError> {
    match present(args, key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Object(_) | Value::Array(_))) => Ok(v.to_string()),
        Some(_) => Err(invalid(key, "a JSON string")),
        None => Err(ToolExecutionError::ArgumentParsingError(format!(
            "Missing '{key}' argument"
        ))),
    }
}

/// A result count. Zero is refused since the database reads it as "no limit".
pub fn limit_or(args: &Value, key: &str, default: u32) -> Result<u32, ToolExecutionError> {
    let parsed = match present(args, key) {
        None => return Ok(default),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid(key, "a positive integer"))
}

pub fn f64_or(args: &Value, key: &str, default: f64) -> Result<f64, ToolExecutionError> {
    let parsed = match present(args, key) {
        None => return Ok(default),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| invalid(key, "a number"))
}

pub fn bool_or(args: &Value, key: &str, default: bool) -> Result<bool, ToolExecutionError> {
    match present(args, key) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(invalid(key, "a boolean")),
        },
        Some(_) => Err(invalid(key, "a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings() {
        let args = json!({"query": "fox", "n": 3, "empty": null});
        assert_eq!(required_str(&args, "query").unwrap(), "fox");
        assert!(required_str(&args, "missing")
            .unwrap_err()
            .to_string()
            .contains("Missing 'missing'"));
        assert!(required_str(&args, "n").is_err());
        assert_eq!(optional_str(&args, "empty").unwrap(), None);
        assert_eq!(string_or(&args, "collection", "notes").unwrap(), "notes");
    }

    #[test]
    fn numbers_accept_strings() {
        let args = json!({"limit": "7", "threshold": 0.6, "bad": -1, "zero": 0, "zero_text": "0"});
        assert_eq!(limit_or(&args, "limit", 5).unwrap(), 7);
        assert_eq!(limit_or(&args, "other", 5).unwrap(), 5);
        assert!(limit_or(&args, "bad", 5).is_err());
        let err = limit_or(&args, "zero", 5).unwrap_err();
        assert!(err.to_string().contains("positive integer"));
        assert!(limit_or(&args, "zero_text", 5).is_err());
        assert!((f64_or(&args, "threshold", 0.5).unwrap() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn booleans_and_json_text() {
        let args = json!({"flag": "yes", "doc": {"a": 1}});
        assert!(bool_or(&args, "flag", false).unwrap());
        assert!(!bool_or(&args, "other", false).unwrap());
        assert_eq!(json_text(&args, "doc").unwrap(), r#"{"a":1}"#);
    }
}
