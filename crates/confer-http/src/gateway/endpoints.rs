//! Endpoint registry: logical operations and their request shapes.

use std::fmt;

use reqwest::Method;

use confer_core::UserType;

/// A logical backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login(UserType),
    RefreshToken,
    Logout,
    Events,
    Agenda,
    AgendaItem,
    Attendees,
    AllDelegates,
    MeetingRequests,
    MeetingRequestAction,
    SendMeetingRequest,
    Profile,
    UpdateProfile,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
}

impl Operation {
    /// Every operation the backend exposes.
    pub const ALL: [Operation; 17] = [
        Operation::Login(UserType::Delegate),
        Operation::Login(UserType::Sponsor),
        Operation::RefreshToken,
        Operation::Logout,
        Operation::Events,
        Operation::Agenda,
        Operation::AgendaItem,
        Operation::Attendees,
        Operation::AllDelegates,
        Operation::MeetingRequests,
        Operation::MeetingRequestAction,
        Operation::SendMeetingRequest,
        Operation::Profile,
        Operation::UpdateProfile,
        Operation::ForgotPassword,
        Operation::VerifyOtp,
        Operation::ResetPassword,
    ];

    pub fn method(&self) -> Method {
        match self {
            Operation::Events
            | Operation::Agenda
            | Operation::AgendaItem
            | Operation::Attendees
            | Operation::AllDelegates
            | Operation::MeetingRequests
            | Operation::Profile => Method::GET,
            _ => Method::POST,
        }
    }

    /// Path template relative to the API base. `{name}` marks a path parameter.
    pub fn path_template(&self) -> &'static str {
        match self {
            Operation::Login(UserType::Delegate) => "/auth/delegate-login",
            Operation::Login(UserType::Sponsor) => "/auth/sponsor-login",
            Operation::RefreshToken => "/auth/refresh-token",
            Operation::Logout => "/auth/logout",
            Operation::Events => "/delegate/events",
            Operation::Agenda => "/agenda/{eventId}",
            Operation::AgendaItem => "/agenda/item/{id}",
            Operation::Attendees => "/delegate/attendees",
            Operation::AllDelegates => "/delegate/all-delegates",
            Operation::MeetingRequests => "/delegate/review-meeting-request",
            Operation::MeetingRequestAction => "/delegate/meeting-request-action",
            Operation::SendMeetingRequest => "/delegate/send-meeting-request",
            Operation::Profile => "/delegate/profile",
            Operation::UpdateProfile => "/delegate/profile/update",
            Operation::ForgotPassword => "/auth/delegate-forgot-password",
            Operation::VerifyOtp => "/auth/verify-forgot-password-otp",
            Operation::ResetPassword => "/auth/delegate-reset-password",
        }
    }

    /// Whether a 401/403 on this operation means the access token expired.
    ///
    /// Public operations answer 401 for bad credentials, which no refresh can fix.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Operation::Login(_)
                | Operation::RefreshToken
                | Operation::ForgotPassword
                | Operation::VerifyOtp
                | Operation::ResetPassword
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Login(UserType::Delegate) => "delegate-login",
            Operation::Login(UserType::Sponsor) => "sponsor-login",
            Operation::RefreshToken => "refresh-token",
            Operation::Logout => "logout",
            Operation::Events => "get-events",
            Operation::Agenda => "get-agenda",
            Operation::AgendaItem => "get-agenda-item",
            Operation::Attendees => "get-attendees",
            Operation::AllDelegates => "get-all-delegates",
            Operation::MeetingRequests => "get-meeting-requests",
            Operation::MeetingRequestAction => "meeting-request-action",
            Operation::SendMeetingRequest => "send-meeting-request",
            Operation::Profile => "get-profile",
            Operation::UpdateProfile => "update-profile",
            Operation::ForgotPassword => "forgot-password",
            Operation::VerifyOtp => "verify-otp",
            Operation::ResetPassword => "reset-password",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
