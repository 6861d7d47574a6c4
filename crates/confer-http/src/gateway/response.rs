//! Response classification.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use confer_core::{GatewayError, HttpError};

use super::message::extract_message;

/// A successful (2xx) response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Parsed body of a JSON response. Empty bodies parse to `Null`.
    Json(Value),
    /// Raw body of a non-JSON response.
    Text(String),
}

impl ApiResponse {
    /// The body as JSON, with text bodies becoming a JSON string.
    pub fn into_json(self) -> Value {
        match self {
            ApiResponse::Json(value) => value,
            ApiResponse::Text(text) => Value::String(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Text(_) => None,
        }
    }

    /// Decode a JSON body into `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.into_json())
    }
}

/// Returns true for `application/json` and `+json` media types.
pub(crate) fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

/// Turn a received status/content-type/body triple into the gateway result.
pub(crate) fn classify(
    status: u16,
    content_type: Option<&str>,
    body: String,
) -> Result<ApiResponse, GatewayError> {
    if (200..300).contains(&status) {
        if !is_json_content_type(content_type) {
            return Ok(ApiResponse::Text(body));
        }
        if body.trim().is_empty() {
            return Ok(ApiResponse::Json(Value::Null));
        }
        return match serde_json::from_str(&body) {
            Ok(value) => Ok(ApiResponse::Json(value)),
            Err(e) => {
                debug!(error = %e, "JSON content-type with unparsable body, returning text");
                Ok(ApiResponse::Text(body))
            }
        };
    }

    let raw_body = error_body(body);
    let message = extract_message(status, &raw_body);
    Err(HttpError::new(status, raw_body, message).into())
}

/// Error bodies are parsed as JSON regardless of content-type.
fn error_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}
