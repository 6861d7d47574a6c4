//! Meeting request commands.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use confer_http::{MeetingDecision, MeetingRequestAction, SendMeetingRequest};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct MeetingRequestsArgs {}

#[derive(Args, Debug)]
pub struct MeetingActionArgs {
    /// Meeting request identifier
    pub id: String,

    /// What to do with the request
    #[arg(value_enum)]
    pub decision: DecisionArg,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DecisionArg {
    Accept,
    Decline,
}

impl From<DecisionArg> for MeetingDecision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Accept => MeetingDecision::Accept,
            DecisionArg::Decline => MeetingDecision::Decline,
        }
    }
}

#[derive(Args, Debug)]
pub struct SendMeetingRequestArgs {
    /// Attendee to meet
    pub receiver_id: String,

    /// Event the meeting belongs to
    #[arg(long)]
    pub event_id: Option<String>,

    /// Proposed date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Proposed time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,

    /// Note for the receiver
    #[arg(long)]
    pub message: Option<String>,
}

pub async fn list(global: &GlobalArgs, _args: MeetingRequestsArgs) -> Result<()> {
    let requests = session::client(global)?
        .meeting_requests()
        .await
        .context("Failed to list meeting requests")?;
    output::json(&requests, global.pretty)
}

pub async fn action(global: &GlobalArgs, args: MeetingActionArgs) -> Result<()> {
    let action = MeetingRequestAction {
        meeting_request_id: args.id,
        action: args.decision.into(),
    };

    let response = session::client(global)?
        .meeting_request_action(&action)
        .await
        .with_context(|| format!("Failed to update meeting request {}", action.meeting_request_id))?;

    output::success("Meeting request updated");
    output::json(&response, global.pretty)
}

pub async fn send(global: &GlobalArgs, args: SendMeetingRequestArgs) -> Result<()> {
    let request = SendMeetingRequest {
        receiver_id: args.receiver_id,
        event_id: args.event_id,
        date: args.date,
        time: args.time,
        message: args.message,
    };

    let response = session::client(global)?
        .send_meeting_request(&request)
        .await
        .context("Failed to send meeting request")?;

    output::success("Meeting request sent");
    output::json(&response, global.pretty)
}
