//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Command;

/// Command-line client for the conference attendee backend.
#[derive(Parser, Debug)]
#[command(name = "confer")]
#[command(author, version = env!("CONFER_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Backend base URL, e.g. https://events.example.com/api
    #[arg(long, env = "CONFER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Credential file (defaults to the platform data directory)
    #[arg(long, env = "CONFER_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
