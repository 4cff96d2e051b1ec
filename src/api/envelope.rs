use serde::Deserialize;
use serde_json::Value;

/// Collection response: `{ code, message, records }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}

/// Single record response: `{ record }`.
#[derive(Debug, Deserialize)]
pub struct RecordEnvelope<T> {
    pub record: T,
}

/// Best-effort error message from a response body.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key)?.as_str())
        .map(str::to_string)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_records_default_to_empty() {
        let envelope: Envelope<Value> =
            serde_json::from_value(json!({ "code": 200, "message": "ok" })).unwrap();
        assert!(envelope.records.is_empty());
        assert_eq!(envelope.message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_error_message_lookup() {
        assert_eq!(
            error_message(r#"{"message":"Unauthenticated."}"#).as_deref(),
            Some("Unauthenticated.")
        );
        assert_eq!(
            error_message(r#"{"error":"boom"}"#).as_deref(),
            Some("boom")
        );
        assert_eq!(error_message("<html>"), None);
        assert_eq!(error_message(r#"{"message":""}"#), None);
    }
}
