//! Whoami command implementation.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use clap::Args;

use confer_core::CredentialStore;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(global: &GlobalArgs, _args: WhoamiArgs) -> Result<()> {
    let store = session::store(global)?;
    let credentials = store.load().await.context("Failed to load credentials")?;

    if !credentials.is_authenticated() {
        anyhow::bail!("No active session. Run 'confer login' first.");
    }

    output::field("Credentials", &store.path().display().to_string());
    if let Some(modified) = store.modified_at() {
        output::field(
            "Updated",
            &modified.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }
    output::field(
        "Refresh token",
        if credentials.refresh_token.is_some() { "yes" } else { "no" },
    );

    match &credentials.principal {
        Some(user) => output::json(user, global.pretty)?,
        None => output::warning("No user profile stored"),
    }

    Ok(())
}
