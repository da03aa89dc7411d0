//! Connection settings for the default transport.

use std::fmt;
use std::time::Duration;

/// Root of the Calendly v2 API.
pub const API_URL: &str = "https://api.calendly.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL, bearer token and HTTP options used to build a [`UreqTransport`].
///
/// The token is fixed at construction; nothing in the crate mutates a
/// `Config` after it has been handed to a transport.
///
/// [`UreqTransport`]: crate::transport::UreqTransport
#[derive(Clone)]
pub struct Config {
    base_url: String,
    token: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: API_URL.to_string(),
            token: token.into(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: concat!("calendly-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Point the client somewhere other than the public API, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whole-call timeout; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
