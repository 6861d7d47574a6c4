//! Subcommand implementations.

mod agenda;
mod attendees;
mod login;
mod logout;
mod meetings;
mod password;
mod profile;
mod refresh_token;
mod whoami;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the returned credentials
    Login(login::LoginArgs),

    /// Log out and clear stored credentials
    Logout(logout::LogoutArgs),

    /// Display the stored user
    Whoami(whoami::WhoamiArgs),

    /// Refresh the access token now
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// List events
    Events(agenda::EventsArgs),

    /// Show the agenda for an event
    Agenda(agenda::AgendaArgs),

    /// Show a single agenda item
    AgendaItem(agenda::AgendaItemArgs),

    /// List attendees, optionally for one event
    Attendees(attendees::AttendeesArgs),

    /// List all delegates
    Delegates(attendees::DelegatesArgs),

    /// List meeting requests
    MeetingRequests(meetings::MeetingRequestsArgs),

    /// Accept or decline a meeting request
    MeetingAction(meetings::MeetingActionArgs),

    /// Send a meeting request to another attendee
    SendMeetingRequest(meetings::SendMeetingRequestArgs),

    /// Show the profile of the logged-in user
    Profile(profile::ProfileArgs),

    /// Update profile fields and photo
    UpdateProfile(profile::UpdateProfileArgs),

    /// Request a password reset code
    ForgotPassword(password::ForgotPasswordArgs),

    /// Verify a password reset code
    VerifyOtp(password::VerifyOtpArgs),

    /// Set a new password
    ResetPassword(password::ResetPasswordArgs),
}

pub async fn handle(global: GlobalArgs, command: Command) -> Result<()> {
    match command {
        Command::Login(args) => login::run(&global, args).await,
        Command::Logout(args) => logout::run(&global, args).await,
        Command::Whoami(args) => whoami::run(&global, args).await,
        Command::RefreshToken(args) => refresh_token::run(&global, args).await,
        Command::Events(args) => agenda::events(&global, args).await,
        Command::Agenda(args) => agenda::agenda(&global, args).await,
        Command::AgendaItem(args) => agenda::agenda_item(&global, args).await,
        Command::Attendees(args) => attendees::attendees(&global, args).await,
        Command::Delegates(args) => attendees::delegates(&global, args).await,
        Command::MeetingRequests(args) => meetings::list(&global, args).await,
        Command::MeetingAction(args) => meetings::action(&global, args).await,
        Command::SendMeetingRequest(args) => meetings::send(&global, args).await,
        Command::Profile(args) => profile::show(&global, args).await,
        Command::UpdateProfile(args) => profile::update(&global, args).await,
        Command::ForgotPassword(args) => password::forgot(&global, args).await,
        Command::VerifyOtp(args) => password::verify(&global, args).await,
        Command::ResetPassword(args) => password::reset(&global, args).await,
    }
}
