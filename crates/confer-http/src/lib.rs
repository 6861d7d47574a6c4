//! confer-http - HTTP access to the conference backend.
//!
//! Three layers, innermost first:
//!
//! - [`RequestGateway`] sends one request with the stored bearer token and
//!   normalizes the response or error.
//! - [`RefreshCoordinator`] turns 401/403 into a single shared token refresh
//!   followed by one retry.
//! - [`ConferClient`] exposes one typed method per backend operation.

mod client;
mod config;
pub mod gateway;
mod refresh;
mod types;

pub use client::ConferClient;
pub use config::{ClientConfig, DEFAULT_USER_AGENT};
pub use gateway::{ApiRequest, ApiResponse, MultipartForm, Operation, RequestGateway};
pub use refresh::{RefreshCoordinator, RefreshFailure};
pub use types::{MeetingDecision, MeetingRequestAction, ResetPassword, SendMeetingRequest};
