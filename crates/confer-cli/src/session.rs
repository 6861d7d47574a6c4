//! Building a client and credential store from the global options.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use confer_core::ApiUrl;
use confer_file::FileCredentialStore;
use confer_http::{ClientConfig, ConferClient};

use crate::cli::GlobalArgs;

/// Get the credential file path.
pub fn credentials_path(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(path) = &global.credentials {
        return Ok(path.clone());
    }

    let dirs = ProjectDirs::from("", "", "confer").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join("credentials.json"))
}

/// Open the credential store.
pub fn store(global: &GlobalArgs) -> Result<Arc<FileCredentialStore>> {
    Ok(Arc::new(FileCredentialStore::new(credentials_path(global)?)))
}

/// Build a client against `--api-url`, sharing the credential store.
pub fn client(global: &GlobalArgs) -> Result<ConferClient> {
    let api_url = global
        .api_url
        .as_deref()
        .context("No API URL. Pass --api-url or set CONFER_API_URL.")?;
    let base_url = ApiUrl::new(api_url).context("Invalid API URL")?;

    let mut config = ClientConfig::new(base_url);
    if let Some(seconds) = global.timeout {
        config = config.with_timeout(Duration::from_secs(seconds));
    }

    ConferClient::new(config, store(global)?).context("Failed to build client")
}
