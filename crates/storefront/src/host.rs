//! Terminal implementations of the core host hooks: notifications on
//! stderr, yes/no prompts, and the "session expired" redirect.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use tracing::{info, warn};

use storefront_core::{Confirm, Level, Navigator, Notification, Notifier};

use crate::cli::GlobalOpts;
use crate::output;

/// Prints notifications to stderr.
///
/// Errors are not printed here: they come back as the command's
/// `CliError` and are rendered once by `main`.
pub struct TerminalNotifier {
    quiet: bool,
    color: bool,
}

impl TerminalNotifier {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            quiet: global.quiet,
            color: output::should_color(global.color),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if self.quiet || notification.level == Level::Error {
            return;
        }
        let Notification { level, message } = notification;
        let line = match (level, self.color) {
            (Level::Success, true) => format!("{} {message}", "✓".green()),
            (Level::Warning, true) => format!("{} {}", "!".yellow(), message.yellow()),
            (Level::Info, true) => format!("{} {message}", "›".cyan()),
            (Level::Success, false) => format!("ok: {message}"),
            (Level::Warning, false) => format!("warning: {message}"),
            _ => message,
        };
        eprintln!("{line}");
    }
}

/// Asks on the terminal unless `--yes` was given.
pub struct PromptConfirm {
    yes: bool,
}

impl PromptConfirm {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!(error = %e, "confirmation prompt failed");
                false
            })
    }
}

/// Whether prompts can be shown at all.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

/// Maps each command to the page it stands for, and records when the
/// client asked to go back to the login page.
pub struct CliNavigator {
    page: &'static str,
    redirected: AtomicBool,
}

impl CliNavigator {
    pub fn new(page: &'static str) -> Self {
        Self {
            page,
            redirected: AtomicBool::new(false),
        }
    }

    pub fn redirected(&self) -> bool {
        self.redirected.load(Ordering::Acquire)
    }
}

impl Navigator for CliNavigator {
    fn current_path(&self) -> String {
        self.page.to_owned()
    }

    fn redirect_to_login(&self) {
        info!(from = self.page, "session rejected; login required");
        self.redirected.store(true, Ordering::Release);
    }
}
