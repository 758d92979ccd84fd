//! Shared helpers for command handlers.

use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use storefront_core::Storefront;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::host::{self, PromptConfirm};

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Commands that act on the account need a stored session.
pub fn require_session(shop: &Storefront) -> Result<(), CliError> {
    if shop.is_signed_in() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

/// Confirmation for a destructive action. Without a terminal the user
/// must pass `--yes` up front.
pub fn confirmer(global: &GlobalOpts, action: &str) -> Result<PromptConfirm, CliError> {
    if !global.yes && !host::is_interactive() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    Ok(PromptConfirm::new(global.yes))
}

/// Hidden prompt for a secret.
pub fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    rpassword::prompt_password(prompt)
        .map(SecretString::from)
        .map_err(prompt_err)
}

/// First line of stdin, for `--password-stdin`.
pub fn read_secret_stdin() -> Result<SecretString, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned()))
}

/// Spinner on stderr while a request is in flight. Hidden in quiet mode
/// and when stderr is not a terminal.
pub fn spinner(global: &GlobalOpts, message: &'static str) -> ProgressBar {
    if global.quiet || !host::is_interactive() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// MIME type from the file extension. Unknown extensions are sent as
/// octet-stream and rejected by the avatar check.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
