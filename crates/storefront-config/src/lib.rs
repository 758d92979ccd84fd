//! Shared configuration for the storefront CLI.
//!
//! TOML profiles, session-token storage selection (keyring, file, memory),
//! and translation to `storefront_core::ClientConfig`. The CLI layers its
//! global flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use storefront_api::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};
use storefront_core::{ClientConfig, DEFAULT_BASE_URL};

const KEYRING_SERVICE: &str = "storefront";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile keeps its session token.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TokenBackend {
    /// OS keychain / secret service.
    #[default]
    Keyring,
    /// JSON file on disk (shared with other tools reading the same key).
    File,
    /// Process memory only; forgotten on exit.
    Memory,
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend root URL (e.g., "https://shop.example.com").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub token_store: TokenBackend,

    /// Session file for the `file` backend. Defaults to the platform data dir.
    pub token_file: Option<PathBuf>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Send cookies alongside the bearer token.
    pub include_credentials: Option<bool>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_store: TokenBackend::default(),
            token_file: None,
            timeout: None,
            include_credentials: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "storefront", "storefront")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default session file for profiles using the `file` backend.
pub fn default_token_file(profile_name: &str) -> PathBuf {
    let file = format!("{profile_name}.session.json");
    project_dirs().map_or_else(
        || dirs_fallback().join(&file),
        |dirs| dirs.data_dir().join(&file),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("storefront");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, merged over defaults and under
/// `STOREFRONT_`-prefixed environment variables (`__` separates levels,
/// e.g. `STOREFRONT_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOREFRONT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Pick the requested profile, else the configured default.
///
/// An unconfigured default profile resolves to built-in defaults so a
/// fresh install works against a local backend.
pub fn resolve_profile(cfg: &Config, requested: Option<&str>) -> Result<(String, Profile), ConfigError> {
    let name = requested
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    match cfg.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if requested.is_none() || name == "default" => Ok((name, Profile::default())),
        None => Err(ConfigError::UnknownProfile(name)),
    }
}

/// Build a `ClientConfig` from a profile. `api_url_override` (the CLI's
/// `--api-url` / `STOREFRONT_API_URL`) replaces the profile's URL.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
    api_url_override: Option<&str>,
) -> Result<ClientConfig, ConfigError> {
    let base_url = api_url_override.unwrap_or(&profile.api_url);
    let config = ClientConfig {
        base_url: base_url.to_owned(),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        include_credentials: profile.include_credentials.unwrap_or(true),
    };
    config.url().map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: e.to_string(),
    })?;
    Ok(config)
}

// ── Session storage ─────────────────────────────────────────────────

/// Session token in the OS keyring, one entry per profile.
pub struct KeyringTokenStore {
    user: String,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            user: format!("{profile_name}/{TOKEN_KEY}"),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, storefront_api::Error> {
        keyring::Entry::new(KEYRING_SERVICE, &self.user)
            .map_err(|e| storefront_api::Error::TokenStorage(e.to_string()))
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<SecretString> {
        let secret = self.entry().ok()?.get_password().ok()?;
        (!secret.is_empty()).then(|| SecretString::from(secret))
    }

    fn store(&self, token: SecretString) -> Result<(), storefront_api::Error> {
        debug!(entry = %self.user, "storing session in keyring");
        self.entry()?
            .set_password(token.expose_secret())
            .map_err(|e| storefront_api::Error::TokenStorage(e.to_string()))
    }

    fn clear(&self) -> Result<(), storefront_api::Error> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(storefront_api::Error::TokenStorage(e.to_string())),
        }
    }
}

/// Open the token store a profile asks for.
pub fn token_store_for(profile: &Profile, profile_name: &str) -> Arc<dyn TokenStore> {
    match profile.token_store {
        TokenBackend::Keyring => Arc::new(KeyringTokenStore::new(profile_name)),
        TokenBackend::File => {
            let path = profile
                .token_file
                .clone()
                .unwrap_or_else(|| default_token_file(profile_name));
            Arc::new(FileTokenStore::new(path))
        }
        TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
    }
}
