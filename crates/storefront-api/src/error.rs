use thiserror::Error;

/// Top-level error type for the `storefront-api` crate.
///
/// Covers every failure mode of the HTTP layer: transport, server-reported
/// status codes, unauthorized responses, and body decoding.
/// `storefront-core` normalizes these into display-ready messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend answered 401. The session hooks have already run by the
    /// time the caller sees this.
    #[error("Unauthorized: {}", message.as_deref().unwrap_or("session missing or expired"))]
    Unauthorized { message: Option<String> },

    /// The stored token cannot be sent as a header value.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-success status with whatever message the server put in the body.
    #[error("API error (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Token file could not be read or written.
    #[error("Token storage error: {0}")]
    TokenStorage(String),
}

impl Error {
    /// The message the server sent, if any.
    ///
    /// Transport and decoding failures never carry a server message.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Unauthorized { message } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the request never got a response.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_only_for_server_errors() {
        let api = Error::Api {
            status: 422,
            message: Some("Postal code is invalid".into()),
        };
        assert_eq!(api.server_message(), Some("Postal code is invalid"));
        assert_eq!(api.status(), Some(422));

        let decode = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert_eq!(decode.server_message(), None);
        assert_eq!(decode.status(), None);
    }

    #[test]
    fn unauthorized_reports_401() {
        let err = Error::Unauthorized { message: None };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("session missing or expired"));
    }
}
