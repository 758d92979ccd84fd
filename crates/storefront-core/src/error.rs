// ── Core error types ──
//
// Pages only ever see `CoreError`. Transport-layer failures are folded into
// a display-ready message by the services, with a fixed fallback per
// operation when the server did not say anything useful.

use thiserror::Error;
use tracing::warn;

use crate::validate::FieldErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request errors (normalized) ──────────────────────────────────
    /// Network failure or server-reported failure.
    #[error("{message}")]
    Request {
        message: String,
        /// HTTP status, when the server answered.
        status: Option<u16>,
    },

    /// The backend rejected the session. The HTTP client has already
    /// handled redirection by the time this surfaces.
    #[error("{message}")]
    Unauthorized { message: String },

    // ── Client-side errors ───────────────────────────────────────────
    /// Form input failed validation; no request was sent.
    #[error("{0}")]
    Validation(FieldErrors),

    /// Input refused before any request (wrong file type, too large, ...).
    #[error("{message}")]
    Rejected { message: String },

    /// The same action is already running.
    #[error("{operation} is already in progress")]
    Busy { operation: &'static str },

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// The page is not in a state that allows this action.
    #[error("{0}")]
    InvalidState(&'static str),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Fold a transport-layer error into a display-ready request error.
    ///
    /// The server's own message wins; otherwise `fallback` is used.
    pub fn normalize(err: storefront_api::Error, fallback: &str) -> Self {
        warn!(error = %err, fallback, "request failed");
        let message = err
            .server_message()
            .map_or_else(|| fallback.to_owned(), str::to_owned);
        if err.is_unauthorized() {
            return Self::Unauthorized { message };
        }
        Self::Request {
            message,
            status: err.status(),
        }
    }

    /// Per-field messages, when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }
}

impl From<storefront_api::Error> for CoreError {
    fn from(err: storefront_api::Error) -> Self {
        Self::normalize(err, "Request failed")
    }
}

/// Attach an operation-specific fallback message to an API result.
pub(crate) trait Normalize<T> {
    fn or_fallback(self, fallback: &str) -> Result<T, CoreError>;
}

impl<T> Normalize<T> for Result<T, storefront_api::Error> {
    fn or_fallback(self, fallback: &str) -> Result<T, CoreError> {
        self.map_err(|e| CoreError::normalize(e, fallback))
    }
}
