//! Request gateway.
//!
//! Sends one request for a logical operation with the stored bearer token and
//! normalizes the outcome into [`ApiResponse`] or [`GatewayError`](confer_core::GatewayError).

mod client;
mod endpoints;
mod message;
mod request;
mod response;

pub use client::RequestGateway;
pub use endpoints::Operation;
pub use message::extract_message;
pub use request::{ApiRequest, MultipartForm, RequestBody};
pub use response::ApiResponse;
