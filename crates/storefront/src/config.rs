//! CLI configuration: thin wrapper around `storefront_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--profile,
//! --api-url, --timeout).

use std::sync::Arc;
use std::time::Duration;

use storefront_config::ConfigError;
use storefront_core::{ClientConfig, TokenStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use storefront_config::{
    Config, Profile, TokenBackend, config_path, load_config_or_default, save_config,
};

/// Everything needed to talk to the backend as the active profile.
pub struct Session {
    pub profile_name: String,
    pub client: ClientConfig,
    pub tokens: Arc<dyn TokenStore>,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Load config, pick the profile, and apply flag overrides.
pub fn resolve_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = load_config_or_default();
    let (profile_name, profile) = storefront_config::resolve_profile(&cfg, global.profile.as_deref())
        .map_err(|e| match e {
            ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
                name,
                available: available_profiles(&cfg),
            },
            other => other.into(),
        })?;

    let mut client =
        storefront_config::profile_to_client_config(&profile, &cfg.defaults, global.api_url.as_deref())?;
    if let Some(secs) = global.timeout {
        client = client.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(profile = %profile_name, url = %client.base_url, "resolved session");

    let tokens = storefront_config::token_store_for(&profile, &profile_name);
    Ok(Session {
        profile_name,
        client,
        tokens,
    })
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
