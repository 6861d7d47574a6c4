//! Profile commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use confer_http::MultipartForm;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ProfileArgs {}

#[derive(Args, Debug)]
pub struct UpdateProfileArgs {
    /// Profile field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Photo to upload
    #[arg(long)]
    pub photo: Option<PathBuf>,

    /// Form field name for the photo
    #[arg(long, default_value = "profile_image")]
    pub photo_field: String,
}

pub async fn show(global: &GlobalArgs, _args: ProfileArgs) -> Result<()> {
    let profile = session::client(global)?
        .profile()
        .await
        .context("Failed to get profile")?;
    output::json(&profile, global.pretty)
}

pub async fn update(global: &GlobalArgs, args: UpdateProfileArgs) -> Result<()> {
    let mut form = args
        .fields
        .into_iter()
        .fold(MultipartForm::new(), |form, (name, value)| {
            form.text(name, value)
        });

    if let Some(path) = &args.photo {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        form = form.file(&args.photo_field, bytes, file_name, mime_for(path));
    }

    if form.is_empty() {
        anyhow::bail!("Nothing to update. Pass --field NAME=VALUE or --photo PATH.");
    }

    let response = session::client(global)?
        .update_profile(form)
        .await
        .context("Failed to update profile")?;

    output::success("Profile updated");
    output::json(&response, global.pretty)
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
