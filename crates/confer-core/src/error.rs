//! Error types for the confer client.
//!
//! Requests against the backend fail in one of two ways: the server was never
//! reached ([`GatewayError::NetworkUnavailable`]) or it answered with a non-2xx
//! status ([`GatewayError::Http`]). Everything above the gateway wraps these
//! in the unified [`Error`] together with storage and input failures.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// User-facing message for requests that never received a response.
pub const NETWORK_UNAVAILABLE_MESSAGE: &str =
    "Network error. Please check your internet connection and try again.";

/// The unified error type for confer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be completed against the backend.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Reading or writing persisted credentials failed.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (bad URL, missing path parameter).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// The backend answered 2xx but the body lacked a required field.
    #[error("unexpected response: {message}")]
    UnexpectedResponse { message: String },
}

impl Error {
    /// Returns the gateway error, if this is one.
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Error::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received.
    NetworkUnavailable,
    /// 401 or 403: the access token was rejected.
    AuthExpired,
    /// Any other non-2xx response.
    Http,
    /// The request could not be built.
    InvalidRequest,
}

/// Failure of a single request issued by the gateway.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Transport-level failure: DNS, connection refused, timeout.
    #[error("{message}")]
    NetworkUnavailable {
        message: String,
        /// Underlying transport error, for logs only.
        cause: String,
    },

    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Http(HttpError),

    /// The request never left the process (unresolved path template, bad header value).
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl GatewayError {
    /// Build a network failure carrying the fixed user-facing message.
    pub fn network(cause: impl fmt::Display) -> Self {
        GatewayError::NetworkUnavailable {
            message: NETWORK_UNAVAILABLE_MESSAGE.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::NetworkUnavailable { .. } => ErrorKind::NetworkUnavailable,
            GatewayError::Http(err) if err.is_auth_expired() => ErrorKind::AuthExpired,
            GatewayError::Http(_) => ErrorKind::Http,
            GatewayError::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    /// Returns true for 401/403 responses.
    pub fn is_auth_expired(&self) -> bool {
        self.kind() == ErrorKind::AuthExpired
    }

    /// HTTP status, absent for failures that produced no response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http(err) => Some(err.status),
            _ => None,
        }
    }

    /// Human-readable message suitable for display.
    pub fn message(&self) -> &str {
        match self {
            GatewayError::NetworkUnavailable { message, .. } => message,
            GatewayError::Http(err) => &err.message,
            GatewayError::InvalidRequest { message } => message,
        }
    }

    /// The structured shape forwarded to callers.
    pub fn payload(&self) -> ErrorPayload {
        match self {
            GatewayError::Http(err) => ErrorPayload {
                status: Some(err.status),
                raw_body: err.raw_body.clone(),
                message: err.message.clone(),
            },
            other => ErrorPayload {
                status: None,
                raw_body: Value::Null,
                message: other.message().to_string(),
            },
        }
    }
}

/// A non-2xx response from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Response body: parsed JSON when possible, otherwise the raw text.
    pub raw_body: Value,
    /// Best-effort message extracted from the body.
    pub message: String,
}

impl HttpError {
    pub fn new(status: u16, raw_body: Value, message: impl Into<String>) -> Self {
        Self {
            status,
            raw_body,
            message: message.into(),
        }
    }

    /// Check whether the server rejected the access token.
    pub fn is_auth_expired(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.message)
    }
}

impl From<HttpError> for GatewayError {
    fn from(err: HttpError) -> Self {
        GatewayError::Http(err)
    }
}

/// Serializable error shape handed to UI callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub status: Option<u16>,
    pub raw_body: Value,
    pub message: String,
}

/// Credential store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem or platform storage failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document could not be encoded or decoded.
    #[error("invalid credential document: {0}")]
    Format(#[from] serde_json::Error),

    /// Storage-specific failure.
    #[error("{message}")]
    Other { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// A path template placeholder had no value.
    #[error("missing path parameter '{name}' for {template}")]
    MissingPathParam { name: String, template: String },

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}
