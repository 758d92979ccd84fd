//! Config subcommand handlers.

use std::str::FromStr;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile, TokenBackend};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const KEYS: &str = "api_url, token_store, token_file, timeout, include_credentials";

fn parse_value<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => profile.api_url = value,
        "token_store" | "token-store" => {
            profile.token_store =
                parse_value("token_store", &value, "one of: keyring, file, memory")?;
        }
        "token_file" | "token-file" => profile.token_file = Some(value.into()),
        "timeout" => profile.timeout = Some(parse_value("timeout", &value, "a number (seconds)")?),
        "include_credentials" | "include-credentials" => {
            profile.include_credentials = Some(parse_value(
                "include_credentials",
                &value,
                "'true' or 'false'",
            )?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("Storefront CLI configuration");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(storefront_core::DEFAULT_BASE_URL.into())
        .interact_text()
        .map_err(prompt_err)?;

    let backends = [TokenBackend::Keyring, TokenBackend::File, TokenBackend::Memory];
    let labels = [
        "System keyring (recommended)",
        "Session file on disk",
        "Memory only (sign in every run)",
    ];
    let choice = Select::new()
        .with_prompt("Where should the session token be kept?")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let token_store = backends.get(choice).copied().unwrap_or_default();

    let profile = Profile {
        api_url,
        token_store,
        ..Profile::default()
    };

    // Keep other profiles when re-running init.
    let mut cfg: Config = config::load_config_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());

    // Validate before writing so a typo never lands on disk.
    let (_, resolved) = storefront_config::resolve_profile(&cfg, Some(&profile_name))?;
    storefront_config::profile_to_client_config(&resolved, &cfg.defaults, None)?;

    let path = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Next: storefront login");
    Ok(())
}
