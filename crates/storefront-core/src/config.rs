// ── Runtime client configuration ──
//
// Describes *where* the backend lives and how to talk to it. Never touches
// disk: the host (CLI, tests) builds a `ClientConfig` and hands it in.

use std::time::Duration;

use url::Url;

use storefront_api::TransportConfig;

use crate::error::CoreError;

/// Backend root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://shop.example.com`. API paths are
    /// resolved against it.
    pub base_url: String,
    pub timeout: Duration,
    /// Carry cookies alongside the bearer token.
    pub include_credentials: bool,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse and check the base URL.
    pub fn url(&self) -> Result<Url, CoreError> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| CoreError::Config {
            message: format!("invalid API URL '{}': {e}", self.base_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("API URL must use http or https, got '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            include_credentials: self.include_credentials,
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
            include_credentials: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.url().unwrap().as_str(), "http://localhost:5000/");
        assert!(cfg.transport().include_credentials);
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(ClientConfig::new("ftp://shop.example.com").url().is_err());
        assert!(ClientConfig::new("not a url").url().is_err());
        let url = ClientConfig::new("https://shop.example.com/store/").url().unwrap();
        assert_eq!(url.path(), "/store/");
    }
}
