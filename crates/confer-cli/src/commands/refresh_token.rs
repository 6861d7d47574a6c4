//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(global: &GlobalArgs, _args: RefreshTokenArgs) -> Result<()> {
    let client = session::client(global)?;

    let credentials = client
        .credentials()
        .await
        .context("Failed to load credentials")?;
    if credentials.is_empty() {
        anyhow::bail!("No active session. Run 'confer login' first.");
    }

    output::status("Refreshing access token...");

    client
        .refresh()
        .await
        .context("Failed to refresh token; stored credentials were cleared")?;

    output::success("Access token refreshed");
    Ok(())
}
