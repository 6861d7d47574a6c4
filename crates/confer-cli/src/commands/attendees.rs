//! Attendee directory commands.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct AttendeesArgs {
    /// Only list attendees of this event
    #[arg(long)]
    pub event_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct DelegatesArgs {}

pub async fn attendees(global: &GlobalArgs, args: AttendeesArgs) -> Result<()> {
    let attendees = session::client(global)?
        .attendees(args.event_id.as_deref())
        .await
        .context("Failed to list attendees")?;
    output::json(&attendees, global.pretty)
}

pub async fn delegates(global: &GlobalArgs, _args: DelegatesArgs) -> Result<()> {
    let delegates = session::client(global)?
        .all_delegates()
        .await
        .context("Failed to list delegates")?;
    output::json(&delegates, global.pretty)
}
