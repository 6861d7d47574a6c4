//! Password recovery commands.

use anyhow::{Context, Result};
use clap::Args;

use confer_http::ResetPassword;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ForgotPasswordArgs {
    /// Account email address
    pub email: String,
}

#[derive(Args, Debug)]
pub struct VerifyOtpArgs {
    /// Account email address
    pub email: String,

    /// One-time code from the reset email
    pub otp: String,
}

#[derive(Args, Debug)]
pub struct ResetPasswordArgs {
    /// Account email address
    #[arg(long)]
    pub email: String,

    /// One-time code from the reset email
    #[arg(long)]
    pub otp: Option<String>,

    /// New password
    #[arg(long, env = "CONFER_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn forgot(global: &GlobalArgs, args: ForgotPasswordArgs) -> Result<()> {
    let response = session::client(global)?
        .forgot_password(&args.email)
        .await
        .context("Failed to request password reset")?;

    output::success("Reset code requested");
    output::json(&response, global.pretty)
}

pub async fn verify(global: &GlobalArgs, args: VerifyOtpArgs) -> Result<()> {
    let response = session::client(global)?
        .verify_otp(&args.email, &args.otp)
        .await
        .context("Failed to verify code")?;

    output::success("Code verified");
    output::json(&response, global.pretty)
}

pub async fn reset(global: &GlobalArgs, args: ResetPasswordArgs) -> Result<()> {
    let reset = ResetPassword {
        email: args.email,
        otp: args.otp,
        password_confirmation: args.password.clone(),
        password: args.password,
    };

    let response = session::client(global)?
        .reset_password(&reset)
        .await
        .context("Failed to reset password")?;

    output::success("Password reset");
    output::json(&response, global.pretty)
}
