mod cli;
mod commands;
mod config;
mod error;
mod host;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use storefront_core::Storefront;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::host::{CliNavigator, TerminalNotifier};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // No backend needed
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "storefront", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let session = config::resolve_session(&cli.global)?;
            let navigator = Arc::new(CliNavigator::new(commands::page_path(&cmd)));
            let notifier = Arc::new(TerminalNotifier::new(&cli.global));
            let shop = Storefront::connect(
                &session.client,
                session.tokens,
                Some(navigator.clone()),
                notifier,
            )?;

            tracing::debug!(command = ?cmd, profile = %session.profile_name, "dispatching command");
            let result = commands::dispatch(cmd, &shop, &cli.global).await;

            // The client already dropped the token; tell the user why.
            match result {
                Err(CliError::AuthFailed { .. }) if navigator.redirected() => {
                    Err(CliError::SessionExpired)
                }
                other => other,
            }
        }
    }
}
