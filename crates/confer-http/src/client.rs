//! Typed client for the conference backend.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use confer_core::error::InvalidInputError;
use confer_core::{
    AccessToken, Credentials, CredentialStore, Error, LoginCredentials, RefreshToken, Result,
};

use crate::config::ClientConfig;
use crate::gateway::{ApiRequest, MultipartForm, Operation, RequestGateway};
use crate::refresh::{RefreshCoordinator, RefreshFailure};
use crate::types::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MeetingRequestAction, ResetPassword,
    SendMeetingRequest, VerifyOtpRequest,
};

/// Entry point for every backend operation.
///
/// Authenticated operations go through the [`RefreshCoordinator`]; public
/// ones (login, password recovery) go straight to the gateway.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use confer_core::{ApiUrl, LoginCredentials, MemoryCredentialStore, UserType};
/// use confer_http::{ClientConfig, ConferClient};
///
/// # async fn example() -> Result<(), confer_core::Error> {
/// let config = ClientConfig::new(ApiUrl::new("https://events.example.com/api")?);
/// let client = ConferClient::new(config, Arc::new(MemoryCredentialStore::new()))?;
///
/// client
///     .login(&LoginCredentials::new("a@b.com", "x", UserType::Delegate))
///     .await?;
/// let events = client.events().await?;
/// println!("{events}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConferClient {
    coordinator: RefreshCoordinator,
    store: Arc<dyn CredentialStore>,
}

impl ConferClient {
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let gateway = RequestGateway::new(&config, Arc::clone(&store))?;
        Ok(Self {
            coordinator: RefreshCoordinator::new(gateway, Arc::clone(&store)),
            store,
        })
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    fn gateway(&self) -> &RequestGateway {
        self.coordinator.gateway()
    }

    /// Currently stored credentials.
    pub async fn credentials(&self) -> Result<Credentials> {
        Ok(self.store.load().await?)
    }

    /// Last-known authenticated user, as returned by login.
    pub async fn principal(&self) -> Result<Option<Value>> {
        Ok(self.store.load().await?.principal)
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in and persist the returned tokens and user.
    #[instrument(skip(self, credentials), fields(email = %credentials.email(), user_type = %credentials.user_type()))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Credentials> {
        info!("Logging in");

        let body = to_body(&LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        })?;
        let request = ApiRequest::new(Operation::Login(credentials.user_type())).json(body);

        let response: LoginResponse = self
            .gateway()
            .execute(&request)
            .await?
            .deserialize()
            .map_err(|e| Error::UnexpectedResponse {
                message: format!("malformed login response: {}", e),
            })?;

        let token = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::UnexpectedResponse {
                message: "login response did not contain a token".to_string(),
            })?;

        let stored = Credentials::new(
            AccessToken::new(token),
            response
                .refresh_token
                .filter(|token| !token.is_empty())
                .map(RefreshToken::new),
            response.data,
        );
        self.store.save(&stored).await?;

        debug!("Login succeeded, credentials stored");
        Ok(stored)
    }

    /// Log out. Local credentials are cleared even when the call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        info!("Logging out");

        if let Err(e) = self
            .coordinator
            .execute(&ApiRequest::new(Operation::Logout))
            .await
        {
            warn!(error = %e, "logout request failed, clearing local credentials anyway");
        }

        self.store.clear().await?;
        Ok(())
    }

    /// Refresh the access token now, joining any refresh already running.
    pub async fn refresh(&self) -> std::result::Result<(), RefreshFailure> {
        self.coordinator.refresh().await
    }

    // ========================================================================
    // Events and agenda
    // ========================================================================

    pub async fn events(&self) -> Result<Value> {
        self.authed(ApiRequest::new(Operation::Events)).await
    }

    pub async fn agenda(&self, event_id: &str) -> Result<Value> {
        let event_id = required("eventId", event_id, Operation::Agenda)?;
        self.authed(ApiRequest::new(Operation::Agenda).path("eventId", event_id))
            .await
    }

    pub async fn agenda_item(&self, id: &str) -> Result<Value> {
        let id = required("id", id, Operation::AgendaItem)?;
        self.authed(ApiRequest::new(Operation::AgendaItem).path("id", id))
            .await
    }

    // ========================================================================
    // Directories
    // ========================================================================

    /// Attendees, optionally narrowed to one event.
    pub async fn attendees(&self, event_id: Option<&str>) -> Result<Value> {
        let mut request = ApiRequest::new(Operation::Attendees);
        if let Some(event_id) = event_id.filter(|id| !id.is_empty()) {
            request = request.query("event_id", event_id);
        }
        self.authed(request).await
    }

    pub async fn all_delegates(&self) -> Result<Value> {
        self.authed(ApiRequest::new(Operation::AllDelegates)).await
    }

    // ========================================================================
    // Meeting requests
    // ========================================================================

    pub async fn meeting_requests(&self) -> Result<Value> {
        self.authed(ApiRequest::new(Operation::MeetingRequests))
            .await
    }

    #[instrument(skip(self))]
    pub async fn meeting_request_action(&self, action: &MeetingRequestAction) -> Result<Value> {
        let body = to_body(action)?;
        self.authed(ApiRequest::new(Operation::MeetingRequestAction).json(body))
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_meeting_request(&self, request: &SendMeetingRequest) -> Result<Value> {
        let body = to_body(request)?;
        self.authed(ApiRequest::new(Operation::SendMeetingRequest).json(body))
            .await
    }

    // ========================================================================
    // Profile
    // ========================================================================

    pub async fn profile(&self) -> Result<Value> {
        self.authed(ApiRequest::new(Operation::Profile)).await
    }

    /// Upload profile changes as a multipart form.
    #[instrument(skip(self, form))]
    pub async fn update_profile(&self, form: MultipartForm) -> Result<Value> {
        if form.is_empty() {
            return Err(InvalidInputError::Other {
                message: "profile update has no fields".to_string(),
            }
            .into());
        }
        self.authed(ApiRequest::new(Operation::UpdateProfile).multipart(form))
            .await
    }

    // ========================================================================
    // Password recovery
    // ========================================================================

    pub async fn forgot_password(&self, email: &str) -> Result<Value> {
        let body = to_body(&ForgotPasswordRequest { email })?;
        self.public(ApiRequest::new(Operation::ForgotPassword).json(body))
            .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Value> {
        let body = to_body(&VerifyOtpRequest { email, otp })?;
        self.public(ApiRequest::new(Operation::VerifyOtp).json(body))
            .await
    }

    #[instrument(skip(self))]
    pub async fn reset_password(&self, reset: &ResetPassword) -> Result<Value> {
        let body = to_body(reset)?;
        self.public(ApiRequest::new(Operation::ResetPassword).json(body))
            .await
    }

    async fn authed(&self, request: ApiRequest) -> Result<Value> {
        Ok(self.coordinator.execute(&request).await?.into_json())
    }

    async fn public(&self, request: ApiRequest) -> Result<Value> {
        Ok(self.gateway().execute(&request).await?.into_json())
    }
}

impl std::fmt::Debug for ConferClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConferClient")
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

fn to_body<T: Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| {
        InvalidInputError::Other {
            message: format!("failed to encode request body: {}", e),
        }
        .into()
    })
}

fn required<'a>(name: &str, value: &'a str, operation: Operation) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(InvalidInputError::MissingPathParam {
            name: name.to_string(),
            template: operation.path_template().to_string(),
        }
        .into());
    }
    Ok(value)
}
