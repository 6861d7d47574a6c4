//! JSON file credential store.
//!
//! The document holds at most three keys: `auth_token`, `refresh_token` and
//! `auth_user`. Writes go to a temporary sibling that is renamed over the
//! target, so readers never see a half-written file. Writers serialize on an
//! advisory lock next to the document.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use confer_core::error::StoreError;
use confer_core::{AccessToken, CredentialStore, Credentials, RefreshToken};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk document layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_user: Option<Value>,
}

impl From<StoredCredentials> for Credentials {
    fn from(stored: StoredCredentials) -> Self {
        Credentials {
            access_token: stored.auth_token.map(AccessToken::new),
            refresh_token: stored.refresh_token.map(RefreshToken::new),
            principal: stored.auth_user,
        }
    }
}

impl From<&Credentials> for StoredCredentials {
    fn from(credentials: &Credentials) -> Self {
        StoredCredentials {
            auth_token: credentials
                .access_token
                .as_ref()
                .map(|t| t.as_str().to_string()),
            refresh_token: credentials
                .refresh_token
                .as_ref()
                .map(|t| t.as_str().to_string()),
            auth_user: credentials.principal.clone(),
        }
    }
}

/// A [`CredentialStore`] persisted as a single JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the file at `path`. The file and its parent
    /// directory are created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the credentials were last written, if they exist.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn read(&self) -> Result<StoredCredentials, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) if json.trim().is_empty() => Ok(StoredCredentials::default()),
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredCredentials::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the document atomically via temp file and rename.
    fn write(&self, stored: &StoredCredentials) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(stored)?;

        let tmp_path = self
            .path
            .with_file_name(format!(".credentials-{}.tmp", Uuid::new_v4().simple()));

        let mut file = File::create(&tmp_path)?;

        // Set restrictive permissions before any secret touches the disk (Unix only)
        #[cfg(unix)]
        {
            let mut perms = file.metadata()?.permissions();
            perms.set_mode(0o600);
            file.set_permissions(perms)?;
        }

        let synced = file
            .write_all(json.as_bytes())
            .and_then(|_| file.sync_all());
        drop(file);
        let written = synced.and_then(|_| fs::rename(&tmp_path, &self.path));

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Run `f` while holding the exclusive writer lock.
    fn locked<T>(&self, f: impl FnOnce(&Self) -> Result<T, StoreError>) -> Result<T, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;

        lock_file.lock_exclusive()?;
        let result = f(self);
        lock_file.unlock()?;

        result
    }

    /// Move blocking filesystem work off the async executor.
    async fn blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&FileCredentialStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Other {
                message: format!("credential store task failed: {}", e),
            })?
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Credentials, StoreError> {
        let stored = self.blocking(|store| store.read()).await?;
        Ok(stored.into())
    }

    #[instrument(skip(self, credentials), fields(path = %self.path.display()))]
    async fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        debug!("Saving credentials");
        let stored = StoredCredentials::from(credentials);
        self.blocking(move |store| store.locked(|store| store.write(&stored)))
            .await
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn update_tokens(
        &self,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
    ) -> Result<(), StoreError> {
        debug!("Updating tokens");
        self.blocking(move |store| {
            store.locked(|store| {
                let mut stored = store.read()?;
                stored.auth_token = Some(access_token.as_str().to_string());
                if let Some(refresh_token) = &refresh_token {
                    stored.refresh_token = Some(refresh_token.as_str().to_string());
                }
                store.write(&stored)
            })
        })
        .await
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<(), StoreError> {
        debug!("Clearing credentials");
        self.blocking(|store| store.locked(|store| store.remove()))
            .await
    }
}
