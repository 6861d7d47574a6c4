//! Credential store trait.

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::StoreError;
use crate::tokens::{AccessToken, RefreshToken};

/// Durable storage for the session's tokens and principal.
///
/// Implementations persist three keys: `auth_token`, `refresh_token` and
/// `auth_user`. Every write method must be atomic from the point of view of
/// a concurrent `load`: readers see either the old set or the new set.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the current credentials. Missing keys load as `None`.
    async fn load(&self) -> Result<Credentials, StoreError>;

    /// Replace all three fields at once (login).
    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError>;

    /// Replace the access token and, when given, the refresh token.
    /// The principal is left untouched.
    async fn update_tokens(
        &self,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
    ) -> Result<(), StoreError>;

    /// Remove all three fields.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Convenience read of the access token alone.
    async fn access_token(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.load().await?.access_token)
    }
}
