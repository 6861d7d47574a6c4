//! Login command implementation.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use confer_core::{LoginCredentials, UserType};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "CONFER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Which kind of account to log in as
    #[arg(long, value_enum, default_value_t = UserTypeArg::Delegate)]
    pub user_type: UserTypeArg,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum UserTypeArg {
    Delegate,
    Sponsor,
}

impl From<UserTypeArg> for UserType {
    fn from(arg: UserTypeArg) -> Self {
        match arg {
            UserTypeArg::Delegate => UserType::Delegate,
            UserTypeArg::Sponsor => UserType::Sponsor,
        }
    }
}

pub async fn run(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let client = session::client(global)?;
    let credentials = LoginCredentials::new(&args.email, &args.password, args.user_type.into());

    output::status("Logging in...");

    let stored = client
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    output::field("Email", &args.email);
    output::field("User type", credentials.user_type().as_str());
    output::field(
        "Refresh token",
        if stored.refresh_token.is_some() { "yes" } else { "no" },
    );

    Ok(())
}
