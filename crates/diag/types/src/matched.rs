//! Cross-channel matched results
//!
//! Produced by external correlation logic and cached as-is. The record is
//! kept as a JSON object; the accessors below only read the fields the
//! matching backend is known to emit and return `None` for anything else.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One correlation record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchedResult(Map<String, Value>);

impl MatchedResult {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a result from any JSON value; non-objects yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn channel_name(&self) -> Option<&str> {
        self.0.get("channel_name").and_then(Value::as_str)
    }

    pub fn start_x(&self) -> Option<f64> {
        self.0.get("start_X").and_then(Value::as_f64)
    }

    pub fn end_x(&self) -> Option<f64> {
        self.0.get("end_X").and_then(Value::as_f64)
    }

    pub fn correlation(&self) -> Option<f64> {
        self.0.get("correlation").and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_fields() {
        let result: MatchedResult = serde_json::from_value(json!({
            "channel_name": "ch2",
            "start_X": 1.25,
            "end_X": 3.5,
            "correlation": 0.91
        }))
        .unwrap();

        assert_eq!(result.channel_name(), Some("ch2"));
        assert_eq!(result.start_x(), Some(1.25));
        assert_eq!(result.end_x(), Some(3.5));
        assert_eq!(result.correlation(), Some(0.91));
    }

    #[test]
    fn test_unknown_shape_is_kept() {
        let result = MatchedResult::from_value(json!({"pair": ["a", "b"]})).unwrap();
        assert!(result.channel_name().is_none());
        assert!(result.correlation().is_none());
        assert_eq!(result.get("pair"), Some(&json!(["a", "b"])));
        assert!(MatchedResult::from_value(json!([1, 2])).is_none());
    }
}
