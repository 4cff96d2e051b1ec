//! Tolerant field decoders for API records.
//!
//! The API is not consistent about types: ids and counts arrive as numbers
//! or strings, text fields may be null. Use with `#[serde(deserialize_with)]`
//! together with `#[serde(default)]`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Any scalar as text; null becomes an empty string.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Any scalar as text; null and blank strings become `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(to_text(Value::deserialize(deserializer)?).filter(|s| !s.trim().is_empty()))
}

/// A number or a numeric string; anything else becomes `None`.
pub fn opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::string")]
        name: String,
        #[serde(default, deserialize_with = "super::opt_string")]
        image: Option<String>,
        #[serde(default, deserialize_with = "super::opt_i64")]
        slots: Option<i64>,
    }

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_null_and_missing_fields() {
        let r = row(json!({ "name": null, "image": null }));
        assert_eq!(r.name, "");
        assert_eq!(r.image, None);
        assert_eq!(r.slots, None);
    }

    #[test]
    fn test_numbers_as_text_and_text_as_numbers() {
        let r = row(json!({ "name": 42, "image": "  ", "slots": "3" }));
        assert_eq!(r.name, "42");
        assert_eq!(r.image, None);
        assert_eq!(r.slots, Some(3));

        assert_eq!(row(json!({ "slots": 5 })).slots, Some(5));
        assert_eq!(row(json!({ "slots": "many" })).slots, None);
    }
}
