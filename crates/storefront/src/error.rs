//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable process exit code.

use miette::Diagnostic;
use thiserror::Error;

use storefront_config::ConfigError;
use storefront_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(storefront::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Override the URL with --api-url or STOREFRONT_API_URL."
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Your session has expired")]
    #[diagnostic(
        code(storefront::session_expired),
        help("Sign in again with: storefront login")
    )]
    SessionExpired,

    #[error("You are not signed in")]
    #[diagnostic(code(storefront::not_signed_in), help("Sign in with: storefront login"))]
    NotSignedIn,

    #[error("{message}")]
    #[diagnostic(code(storefront::auth_failed))]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(storefront::not_found),
        help("Run: storefront {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(storefront::api_error))]
    Api { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{summary}")]
    #[diagnostic(code(storefront::validation), help("{details}"))]
    InvalidInput { summary: String, details: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(storefront::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(storefront::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: storefront config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("{0}")]
    #[diagnostic(
        code(storefront::config),
        help("Inspect the file with: storefront config show")
    )]
    Config(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(storefront::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(storefront::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(storefront::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::SessionExpired | Self::NotSignedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Api {
                status: Some(409), ..
            } => exit_code::CONFLICT,
            Self::InvalidInput { .. }
            | Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

fn list_command_for(resource: &str) -> &'static str {
    match resource {
        "Order" => "orders list",
        "Wishlist item" => "wishlist list",
        _ => "addresses list",
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Request {
                message,
                status: None,
            } => Self::ConnectionFailed { message },

            CoreError::Request { message, status } => Self::Api { status, message },

            CoreError::Unauthorized { message } => Self::AuthFailed { message },

            CoreError::Validation(errors) => Self::InvalidInput {
                summary: errors.to_string(),
                details: errors
                    .iter()
                    .map(|(field, msg)| format!("{field}: {msg}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            },

            CoreError::Rejected { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotFound { resource, id } => Self::NotFound {
                list_command: list_command_for(resource).into(),
                resource_type: resource.into(),
                identifier: id,
            },

            other @ (CoreError::Busy { .. } | CoreError::InvalidState(_)) => Self::Api {
                status: None,
                message: other.to_string(),
            },

            CoreError::Config { message } => Self::Config(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile(name) => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other.to_string()),
        }
    }
}
