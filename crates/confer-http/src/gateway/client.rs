//! HTTP client for backend requests.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, instrument, trace, warn};

use confer_core::{AccessToken, ApiUrl, CredentialStore, Error, GatewayError, InvalidInputError};

use crate::config::ClientConfig;

use super::request::{ApiRequest, RequestBody};
use super::response::{ApiResponse, classify};

/// Issues authenticated HTTP calls and classifies their responses.
///
/// The gateway reads the access token from the credential store on every
/// call but never writes it, and never reacts to 401/403 on its own.
#[derive(Clone)]
pub struct RequestGateway {
    client: reqwest::Client,
    base: ApiUrl,
    store: Arc<dyn CredentialStore>,
}

impl RequestGateway {
    /// Create a gateway for the configured backend.
    pub fn new(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| InvalidInputError::Other {
            message: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base: config.base_url.clone(),
            store,
        })
    }

    /// Returns the API base URL this gateway talks to.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base
    }

    /// Send one request. HTTP failures come back as `Err`, never as panics.
    #[instrument(skip(self, request), fields(api = %self.base, operation = %request.operation()))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        let operation = request.operation();
        let url = self.base.endpoint(request.path_segments()?);
        let method = operation.method();
        debug!(%method, path = url.path(), "sending request");

        let token = self.current_token().await;
        let headers = request_headers(token.as_ref(), request.body())?;

        let mut builder = self.client.request(method, url).headers(headers);
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };

        let response = builder.send().await.map_err(GatewayError::network)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        trace!(status, content_type = ?content_type, "response received");

        let body = response.text().await.map_err(GatewayError::network)?;

        classify(status, content_type.as_deref(), body)
    }

    /// An unreadable store is treated as "no token"; the request still goes out.
    async fn current_token(&self) -> Option<AccessToken> {
        match self.store.access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "failed to read access token, sending request without it");
                None
            }
        }
    }
}

impl std::fmt::Debug for RequestGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGateway")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// Build the header set for a request.
fn request_headers(
    token: Option<&AccessToken>,
    body: &RequestBody,
) -> Result<HeaderMap, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    // Multipart bodies carry their own boundary content-type.
    if !matches!(body, RequestBody::Multipart(_)) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str())).map_err(
            |_| GatewayError::InvalidRequest {
                message: "access token contains invalid header characters".to_string(),
            },
        )?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
