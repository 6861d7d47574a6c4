//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use confer_core::CredentialStore;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Only clear local credentials, without calling the backend
    #[arg(long)]
    pub local: bool,
}

pub async fn run(global: &GlobalArgs, args: LogoutArgs) -> Result<()> {
    if args.local {
        session::store(global)?
            .clear()
            .await
            .context("Failed to clear credentials")?;
    } else {
        session::client(global)?
            .logout()
            .await
            .context("Failed to clear credentials")?;
    }

    output::success("Logged out");
    Ok(())
}
