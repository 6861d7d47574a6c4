//! Event and agenda commands.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct EventsArgs {}

#[derive(Args, Debug)]
pub struct AgendaArgs {
    /// Event identifier
    pub event_id: String,
}

#[derive(Args, Debug)]
pub struct AgendaItemArgs {
    /// Agenda item identifier
    pub id: String,
}

pub async fn events(global: &GlobalArgs, _args: EventsArgs) -> Result<()> {
    let events = session::client(global)?
        .events()
        .await
        .context("Failed to list events")?;
    output::json(&events, global.pretty)
}

pub async fn agenda(global: &GlobalArgs, args: AgendaArgs) -> Result<()> {
    let agenda = session::client(global)?
        .agenda(&args.event_id)
        .await
        .with_context(|| format!("Failed to get agenda for event {}", args.event_id))?;
    output::json(&agenda, global.pretty)
}

pub async fn agenda_item(global: &GlobalArgs, args: AgendaItemArgs) -> Result<()> {
    let item = session::client(global)?
        .agenda_item(&args.id)
        .await
        .with_context(|| format!("Failed to get agenda item {}", args.id))?;
    output::json(&item, global.pretty)
}
