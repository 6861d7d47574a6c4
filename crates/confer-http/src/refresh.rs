//! Token refresh coordination.
//!
//! Any number of requests may see a 401/403 at the same time. Only the first
//! starts a refresh; the rest join the same in-flight future through a
//! [`Shared`] handle. The handle lives in a slot guarded by a synchronous
//! mutex, so check-and-set never spans an await point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

use confer_core::{AccessToken, CredentialStore, GatewayError, RefreshToken};

use crate::gateway::{ApiRequest, ApiResponse, Operation, RequestGateway};

/// Why a refresh episode failed. Credentials are already cleared when a
/// caller sees this.
#[derive(Debug, Clone, Error)]
pub enum RefreshFailure {
    /// The refresh call itself failed (network or non-2xx).
    #[error("refresh request failed: {0}")]
    Request(GatewayError),

    /// The refresh call succeeded but carried no access token.
    #[error("refresh response did not contain an access token")]
    MissingToken,

    /// The credential store could not be read or updated.
    #[error("credential store error during refresh: {0}")]
    Store(String),
}

type RefreshOutcome = Result<(), RefreshFailure>;

struct InFlight {
    episode: u64,
    outcome: Shared<BoxFuture<'static, RefreshOutcome>>,
}

struct CoordinatorInner {
    gateway: RequestGateway,
    store: Arc<dyn CredentialStore>,
    in_flight: Mutex<Option<InFlight>>,
    episodes: AtomicU64,
}

/// Wraps the gateway with transparent token refresh.
///
/// Cheap to clone; all clones share the same in-flight slot, so build one
/// per process and hand clones to callers.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl RefreshCoordinator {
    pub fn new(gateway: RequestGateway, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                gateway,
                store,
                in_flight: Mutex::new(None),
                episodes: AtomicU64::new(0),
            }),
        }
    }

    pub fn gateway(&self) -> &RequestGateway {
        &self.inner.gateway
    }

    /// Send a request, refreshing the access token once if it is rejected.
    ///
    /// On a 401/403 from an auth-required operation the request waits for
    /// the shared refresh. After a successful refresh it is re-sent exactly
    /// once and that outcome is returned as-is. After a failed refresh the
    /// original 401/403 is returned.
    #[instrument(skip(self, request), fields(operation = %request.operation()))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        let original = match self.inner.gateway.execute(request).await {
            Err(err) if err.is_auth_expired() && request.operation().requires_auth() => err,
            outcome => return outcome,
        };

        debug!(status = ?original.status(), "access token rejected, awaiting refresh");

        match self.refresh().await {
            Ok(()) => {
                debug!("retrying request with refreshed token");
                self.inner.gateway.execute(request).await
            }
            Err(failure) => {
                warn!(%failure, "refresh failed, returning original error");
                Err(original)
            }
        }
    }

    /// Join the in-flight refresh, starting one if none is running.
    pub async fn refresh(&self) -> Result<(), RefreshFailure> {
        let outcome = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            match slot.as_ref() {
                Some(in_flight) => {
                    debug!(episode = in_flight.episode, "joining in-flight refresh");
                    in_flight.outcome.clone()
                }
                None => {
                    let episode = self.inner.episodes.fetch_add(1, Ordering::Relaxed) + 1;
                    let outcome = run_episode(
                        Arc::downgrade(&self.inner),
                        self.inner.gateway.clone(),
                        Arc::clone(&self.inner.store),
                        episode,
                    )
                    .instrument(info_span!("refresh_episode", episode))
                    .boxed()
                    .shared();
                    *slot = Some(InFlight {
                        episode,
                        outcome: outcome.clone(),
                    });
                    outcome
                }
            }
        };

        outcome.await
    }

    /// Returns true while a refresh episode is running.
    pub fn is_refreshing(&self) -> bool {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("gateway", &self.inner.gateway)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

impl CoordinatorInner {
    /// Empty the slot, unless a newer episode already took it.
    fn finish(&self, episode: u64) {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|in_flight| in_flight.episode == episode) {
            *slot = None;
        }
    }
}

/// One refresh episode: call, persist or tear down, then release the slot.
///
/// Holds only a weak reference to the coordinator; the slot owns this future.
async fn run_episode(
    coordinator: Weak<CoordinatorInner>,
    gateway: RequestGateway,
    store: Arc<dyn CredentialStore>,
    episode: u64,
) -> RefreshOutcome {
    info!("Refreshing access token");

    let outcome = attempt_refresh(&gateway, store.as_ref()).await;

    match &outcome {
        Ok(()) => info!("Access token refreshed"),
        Err(failure) => {
            warn!(%failure, "Refresh failed, clearing credentials");
            if let Err(e) = store.clear().await {
                error!(error = %e, "failed to clear credentials after refresh failure");
            }
        }
    }

    if let Some(inner) = coordinator.upgrade() {
        inner.finish(episode);
    }

    outcome
}

async fn attempt_refresh(gateway: &RequestGateway, store: &dyn CredentialStore) -> RefreshOutcome {
    let refresh_token = store
        .load()
        .await
        .map_err(|e| RefreshFailure::Store(e.to_string()))?
        .refresh_token;

    let mut body = Map::new();
    if let Some(token) = &refresh_token {
        body.insert(
            "refresh_token".to_string(),
            Value::String(token.as_str().to_string()),
        );
    }

    // Straight to the gateway: the refresh call never re-enters refresh handling.
    let request = ApiRequest::new(Operation::RefreshToken).json(Value::Object(body));
    let response = gateway
        .execute(&request)
        .await
        .map_err(RefreshFailure::Request)?;

    let (access_token, refresh_token) =
        token_grant(&response.into_json()).ok_or(RefreshFailure::MissingToken)?;

    store
        .update_tokens(access_token, refresh_token)
        .await
        .map_err(|e| RefreshFailure::Store(e.to_string()))
}

const ACCESS_TOKEN_FIELDS: &[&str] = &["token", "access_token", "accessToken"];
const REFRESH_TOKEN_FIELDS: &[&str] = &["refresh_token", "refreshToken"];

/// Pull the new token pair from a refresh response, top level first, then `data`.
fn token_grant(body: &Value) -> Option<(AccessToken, Option<RefreshToken>)> {
    [Some(body), body.get("data")]
        .into_iter()
        .flatten()
        .find_map(|scope| {
            let access = first_string(scope, ACCESS_TOKEN_FIELDS)?;
            let refresh = first_string(scope, REFRESH_TOKEN_FIELDS);
            Some((AccessToken::new(access), refresh.map(RefreshToken::new)))
        })
}

fn first_string<'a>(scope: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| scope.get(*field)?.as_str())
        .find(|value| !value.is_empty())
}
