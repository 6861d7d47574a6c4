//! In-memory credential store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::credentials::Credentials;
use crate::error::StoreError;
use crate::tokens::{AccessToken, RefreshToken};
use crate::traits::CredentialStore;

/// A process-local [`CredentialStore`]. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given credentials already stored.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: RwLock::new(credentials),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Credentials, StoreError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        *self.inner.write().await = credentials.clone();
        Ok(())
    }

    async fn update_tokens(
        &self,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
    ) -> Result<(), StoreError> {
        let mut current = self.inner.write().await;
        current.access_token = Some(access_token);
        if let Some(refresh_token) = refresh_token {
            current.refresh_token = Some(refresh_token);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.inner.write().await = Credentials::default();
        Ok(())
    }
}
