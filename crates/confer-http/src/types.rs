//! Request and response bodies for the typed client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body for the login endpoints.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from the login endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// The authenticated user.
    #[serde(default)]
    pub data: Option<Value>,
}

/// Reply to an incoming meeting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingDecision {
    Accept,
    Decline,
}

/// Body for the meeting-request action endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingRequestAction {
    pub meeting_request_id: String,
    pub action: MeetingDecision,
}

/// Body for sending a meeting request to another delegate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendMeetingRequest {
    pub receiver_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Serialize)]
pub(crate) struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

/// Body for the password reset endpoint.
#[derive(Clone, Serialize)]
pub struct ResetPassword {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    pub password: String,
    pub password_confirmation: String,
}

impl std::fmt::Debug for ResetPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPassword")
            .field("email", &self.email)
            .field("otp", &self.otp.as_ref().map(|_| "[REDACTED]"))
            .field("password", &"[REDACTED]")
            .finish()
    }
}
