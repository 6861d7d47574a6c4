//! Error message extraction from non-2xx bodies.
//!
//! Backends disagree on where they put the human-readable message. Each
//! extractor probes one known location; the first non-empty hit wins.

use serde_json::Value;

type Extractor = fn(&Value) -> Option<&str>;

/// Probe order matters: earlier locations take precedence.
const EXTRACTORS: &[Extractor] = &[
    body_string,
    message_field,
    error_field,
    first_error,
    msg_field,
    data_message,
];

/// Best-effort human message for an error response.
pub fn extract_message(status: u16, body: &Value) -> String {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(body).filter(|text| !text.trim().is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status))
}

fn body_string(body: &Value) -> Option<&str> {
    body.as_str()
}

fn message_field(body: &Value) -> Option<&str> {
    body.get("message")?.as_str()
}

fn error_field(body: &Value) -> Option<&str> {
    string_or_message(body.get("error")?)
}

fn first_error(body: &Value) -> Option<&str> {
    string_or_message(body.get("errors")?.as_array()?.first()?)
}

fn msg_field(body: &Value) -> Option<&str> {
    body.get("msg")?.as_str()
}

fn data_message(body: &Value) -> Option<&str> {
    body.get("data")?.get("message")?.as_str()
}

fn string_or_message(value: &Value) -> Option<&str> {
    value
        .as_str()
        .or_else(|| value.get("message").and_then(Value::as_str))
}
