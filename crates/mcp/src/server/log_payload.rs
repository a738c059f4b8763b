//! Helpers for building sanitized request/response log payloads.
//!
//! Payloads are assembled here and scrubbed before they reach a log line:
//! credential-named fields are masked, the current token is replaced, and
//! flag or assignment shaped credentials (`--admintoken x`) are masked even
//! when they belong to a token that has since been rotated.

use chrono::{SecondsFormat, Utc};
use coho_mcp_util::{redact_json_fields, redact_secret, redact_sensitive};
use serde_json::{Map, Value};

const MAX_RESPONSE_TEXT_PARSE_BYTES: usize = 256 * 1024;
const MAX_LOG_PAYLOAD_BYTES: usize = 512 * 1024;

/// Builds the standard exchange payload.
///
/// The payload includes `request` and/or `response` when present. Returns
/// `None` when both values are absent.
pub(crate) fn build_log_payload(request: Option<Value>, response: Option<Value>) -> Option<Value> {
    let mut payload = Map::new();
    if let Some(request_value) = request {
        payload.insert("request".to_string(), request_value);
    }
    if let Some(response_value) = response {
        if let Some(parsed) = extract_json_value_from_response_text(&response_value) {
            payload.insert("parsed_response_text".to_string(), parsed);
        }
        payload.insert("response".to_string(), response_value);
    }
    if payload.is_empty() { None } else { Some(Value::Object(payload)) }
}

/// Builds a timestamped, redacted payload for one tool exchange.
///
/// Oversized payloads are replaced by a size marker.
pub(crate) fn sanitized_exchange(tool: &str, request: Option<Value>, response: Option<Value>, secret: Option<&str>) -> Value {
    let mut payload = match build_log_payload(request, response) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    payload.insert("tool".to_string(), Value::String(tool.to_string()));
    payload.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    let mut payload = Value::Object(payload);
    redact_json_fields(&mut payload);
    redact_strings(&mut payload, secret);

    let size = serde_json::to_vec(&payload).map(|bytes| bytes.len()).unwrap_or(usize::MAX);
    if size > MAX_LOG_PAYLOAD_BYTES {
        return serde_json::json!({ "tool": tool, "omitted_bytes": size });
    }
    payload
}

fn redact_strings(value: &mut Value, secret: Option<&str>) {
    match value {
        Value::String(text) => *text = redact_sensitive(&redact_secret(text, secret)),
        Value::Array(items) => items.iter_mut().for_each(|item| redact_strings(item, secret)),
        Value::Object(map) => map.values_mut().for_each(|item| redact_strings(item, secret)),
        _ => {}
    }
}

fn extract_json_value_from_response_text(response: &Value) -> Option<Value> {
    let text = find_text_field(response)?;
    if text.len() > MAX_RESPONSE_TEXT_PARSE_BYTES {
        return None;
    }
    let parsed = serde_json::from_str::<Value>(text).ok()?;
    if parsed.is_object() || parsed.is_array() {
        Some(parsed)
    } else {
        None
    }
}

fn find_text_field(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => {
            if let Some(text_value) = map.get("text").and_then(Value::as_str) {
                return Some(text_value);
            }
            map.values().find_map(find_text_field)
        }
        Value::Array(items) => items.iter().find_map(find_text_field),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_nested_response_text_json() {
        let response = json!({
            "content": [
                {
                    "type": "text",
                    "text": "[{\"name\":\"Joe\"}]"
                }
            ]
        });
        let payload = build_log_payload(None, Some(response)).expect("payload");
        assert_eq!(payload["parsed_response_text"][0]["name"], "Joe");
    }

    #[test]
    fn ignores_scalar_and_plain_text() {
        let payload = build_log_payload(None, Some(json!({ "text": "Deployed" }))).expect("payload");
        assert!(payload.get("parsed_response_text").is_none());
        assert!(build_log_payload(None, None).is_none());
    }

    #[test]
    fn exchange_payload_masks_credentials_and_the_literal_token() {
        let payload = sanitized_exchange(
            "configure",
            Some(json!({ "token": "tkn_abc123", "project": "proj1" })),
            Some(json!({ "content": [{ "text": "echo tkn_abc123" }] })),
            Some("tkn_abc123"),
        );
        let rendered = payload.to_string();
        assert!(!rendered.contains("tkn_abc123"), "{rendered}");
        assert_eq!(payload["request"]["project"], "proj1");
        assert_eq!(payload["tool"], "configure");
        assert!(payload["timestamp"].is_string());
    }
}
