// Shared transport configuration for building the reqwest::Client.
//
// The host builds one client per process from this config and hands it to
// `ApiClient`; every endpoint module reuses it.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
    /// Send cookies on every request, including cross-origin ones.
    pub include_credentials: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_owned(),
            include_credentials: true,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .cookie_store(self.include_credentials)
            .build()
            .map_err(Error::Transport)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
