//! Client configuration.

use std::time::Duration;

use confer_core::ApiUrl;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("confer/", env!("CARGO_PKG_VERSION"));

/// Settings for building a [`ConferClient`](crate::ConferClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; operation paths are appended to it.
    pub base_url: ApiUrl,
    pub user_agent: String,
    /// Whole-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
