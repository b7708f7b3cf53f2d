//! Bridge protocol types
//!
//! Requests are free-form JSON objects. Only two keys are recognized:
//! `id` (echoed back, default `0`) and `type` (default `"unknown"`).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ParseError;

/// `type` value that asks the bridge to stop after acknowledging.
pub const SHUTDOWN_TYPE: &str = "shutdown";

/// Reported `type` when a request carries none.
pub const UNKNOWN_TYPE: &str = "unknown";

/// A parsed request object.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    fields: Map<String, Value>,
}

impl Request {
    /// Parse one whitespace-stripped request line.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        match serde_json::from_str::<Value>(line)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ParseError::NotAnObject(kind_name(&other))),
        }
    }

    /// Correlation id, echoed verbatim. `0` when absent.
    pub fn id(&self) -> Value {
        self.fields
            .get("id")
            .cloned()
            .unwrap_or_else(|| Value::from(0))
    }

    /// Request type. Non-string values are rendered as compact JSON.
    pub fn kind(&self) -> String {
        match self.fields.get("type") {
            None | Some(Value::Null) => UNKNOWN_TYPE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Whether this request asks the bridge to stop.
    pub fn is_shutdown(&self) -> bool {
        matches!(self.fields.get("type"), Some(Value::String(s)) if s == SHUTDOWN_TYPE)
    }

    /// Any other field of the request.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All request fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Response line sent back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Request ID for correlation
    pub id: Value,
    /// `false` only when the request line was malformed
    pub success: bool,
    /// Acknowledgement text on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description on malformed input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Acknowledge a well-formed request
    pub fn received(request: &Request) -> Self {
        Self {
            id: request.id(),
            success: true,
            message: Some(format!("Received {} request", request.kind())),
            error: None,
        }
    }

    /// Report a malformed request line
    pub fn malformed(err: &ParseError) -> Self {
        Self {
            id: Value::from(0),
            success: false,
            message: None,
            error: Some(err.to_string()),
        }
    }

    /// Serialize to a single line of JSON, without the trailing newline.
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn ack(line: &str) -> Value {
        let request = Request::parse(line).expect("request should parse");
        serde_json::to_value(Response::received(&request)).expect("serializes")
    }

    #[test]
    fn test_ping_echoes_id_and_type() {
        assert_eq!(
            ack(r#"{"id": 5, "type": "ping"}"#),
            json!({"id": 5, "success": true, "message": "Received ping request"})
        );
    }

    #[test]
    fn test_missing_id_defaults_to_zero() {
        assert_eq!(
            ack(r#"{"type": "status"}"#),
            json!({"id": 0, "success": true, "message": "Received status request"})
        );
    }

    #[test]
    fn test_missing_type_is_unknown() {
        assert_eq!(
            ack(r#"{"id": 3}"#),
            json!({"id": 3, "success": true, "message": "Received unknown request"})
        );
    }

    #[test_case(r#"{"type": null}"#, "unknown" ; "null type")]
    #[test_case(r#"{"type": 7}"#, "7" ; "numeric type")]
    #[test_case(r#"{"type": true}"#, "true" ; "boolean type")]
    #[test_case(r#"{"type": ["a"]}"#, r#"["a"]"# ; "array type")]
    #[test_case(r#"{"type": ""}"#, "" ; "empty string type")]
    fn test_kind_rendering(line: &str, expected: &str) {
        let request = Request::parse(line).expect("request should parse");
        assert_eq!(request.kind(), expected);
    }

    #[test]
    fn test_id_is_echoed_verbatim() {
        assert_eq!(ack(r#"{"id": -2.5}"#)["id"], json!(-2.5));
        assert_eq!(ack(r#"{"id": "abc"}"#)["id"], json!("abc"));
        assert_eq!(ack(r#"{"id": null}"#)["id"], Value::Null);
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let request = Request::parse(r#"{"id": 1, "type": "load", "path": "/plugins/a.py"}"#)
            .expect("request should parse");
        assert_eq!(request.get("path"), Some(&json!("/plugins/a.py")));
        assert_eq!(request.fields().len(), 3);
    }

    #[test]
    fn test_shutdown_detection() {
        assert!(Request::parse(r#"{"type": "shutdown"}"#).unwrap().is_shutdown());
        assert!(!Request::parse(r#"{"type": "Shutdown"}"#).unwrap().is_shutdown());
        assert!(!Request::parse(r#"{"id": 1}"#).unwrap().is_shutdown());
    }

    #[test_case("not json" ; "bare words")]
    #[test_case("{\"id\": 1" ; "truncated object")]
    #[test_case("{'id': 1}" ; "single quotes")]
    fn test_invalid_json_is_rejected(line: &str) {
        assert!(matches!(Request::parse(line), Err(ParseError::InvalidJson(_))));
    }

    #[test_case("[1, 2]", "array" ; "array")]
    #[test_case("42", "number" ; "number")]
    #[test_case("\"ping\"", "string" ; "string")]
    #[test_case("null", "null" ; "null")]
    fn test_non_object_is_rejected(line: &str, kind: &str) {
        match Request::parse(line) {
            Err(ParseError::NotAnObject(got)) => assert_eq!(got, kind),
            other => panic!("expected NotAnObject, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_response_shape() {
        let err = Request::parse("not json").unwrap_err();
        let value = serde_json::to_value(Response::malformed(&err)).unwrap();
        assert_eq!(value["id"], json!(0));
        assert_eq!(value["success"], json!(false));
        assert!(!value["error"].as_str().unwrap().is_empty());
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_to_line_field_order_and_single_line() {
        let request = Request::parse(r#"{"id": 5, "type": "multi\nline"}"#).unwrap();
        let line = Response::received(&request).to_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.starts_with(r#"{"id":5,"success":true,"message":"#));
    }
}
