//! Value parsers for command-line arguments.

use serde_json::Value;

use dynaglue_core::item::KeyMatch;
use dynaglue_core::storage::Document;

use crate::error::CliError;

/// Parses a value as JSON when it is valid JSON, otherwise as a plain string.
///
/// `42` is a number, `true` a boolean, `"42"` the string `42`, and `Ada`
/// the string `Ada`.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parses a JSON object of attributes.
pub fn parse_attributes(raw: &str) -> Result<Document, CliError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(CliError::InvalidAttributes(format!(
            "expected an object, got {other}"
        ))),
        Err(e) => Err(CliError::InvalidAttributes(e.to_string())),
    }
}

/// Parses `NAME=VALUE` keeping the value as text.
pub fn parse_pair(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidPair(raw.to_string())),
    }
}

/// Parses `NAME=VALUE` with the value read by [`parse_value`].
pub fn parse_value_pair(raw: &str) -> Result<(String, Value), CliError> {
    parse_pair(raw).map(|(name, value)| (name, parse_value(&value)))
}

/// Parses a key equality match, `NAME=VALUE`.
pub fn parse_key_match(raw: &str) -> Result<KeyMatch, CliError> {
    parse_value_pair(raw).map(|(name, value)| KeyMatch::new(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value_prefers_json() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("\"42\""), json!("42"));
        assert_eq!(parse_value("[1,2]"), json!([1, 2]));
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        assert_eq!(parse_value("Ada"), json!("Ada"));
        assert_eq!(parse_value("2024-01-15"), json!("2024-01-15"));
        assert_eq!(parse_value(""), json!(""));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("#s=status").unwrap(),
            ("#s".to_string(), "status".to_string())
        );
        assert_eq!(
            parse_pair("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_pair("novalue"),
            Err(CliError::InvalidPair("novalue".to_string()))
        );
        assert_eq!(
            parse_pair("=value"),
            Err(CliError::InvalidPair("=value".to_string()))
        );
    }

    #[test]
    fn test_parse_key_match() {
        assert_eq!(
            parse_key_match("year=2024").unwrap(),
            KeyMatch::new("year", 2024)
        );
        assert_eq!(
            parse_key_match("email=ada@example.com").unwrap(),
            KeyMatch::new("email", "ada@example.com")
        );
    }

    #[test]
    fn test_parse_attributes() {
        let document = parse_attributes(r#"{"name":"Ada","age":36}"#).unwrap();
        assert_eq!(document.get("age"), Some(&json!(36)));

        assert!(matches!(
            parse_attributes("[1]"),
            Err(CliError::InvalidAttributes(_))
        ));
        assert!(matches!(
            parse_attributes("{"),
            Err(CliError::InvalidAttributes(_))
        ));
    }
}
