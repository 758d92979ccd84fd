// Session plumbing injected into `ApiClient` by the host.
//
// The token lives behind `TokenStore`; navigation on an unauthorized
// response goes through `Navigator`. The client never touches a global.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::Error;

/// Fixed key the bearer token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Page paths that host the login and registration forms.
const AUTH_PAGES: &[&str] = &["/login", "/register"];

/// Endpoints whose 401 means "bad credentials", not "session expired".
const AUTH_ENDPOINTS: &[&str] = &["/api/users/login", "/api/users/register"];

// ── Token storage ───────────────────────────────────────────────────

/// Persisted storage for the bearer token.
///
/// Read before every request, written by login, cleared by logout and by the
/// unauthorized handler.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<SecretString>;
    fn store(&self, token: SecretString) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// In-process token storage. Lost when the process exits.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: ArcSwapOption<SecretString>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .token
            .store(Some(Arc::new(SecretString::from(token.into()))));
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.token.load_full().map(|t| (*t).clone())
    }

    fn store(&self, token: SecretString) -> Result<(), Error> {
        self.token.store(Some(Arc::new(token)));
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        self.token.store(None);
        Ok(())
    }
}

/// Token storage backed by a small JSON key/value file.
///
/// Other keys in the file are preserved; only [`TOKEN_KEY`] is touched.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<serde_json::Map<String, serde_json::Value>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(serde_json::Map::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| Error::TokenStorage(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Map::new()),
            Err(e) => Err(Error::TokenStorage(e.to_string())),
        }
    }

    /// Like `read_map`, but logs before refusing to overwrite a file
    /// that is not a JSON object.
    fn read_existing(&self) -> Result<serde_json::Map<String, serde_json::Value>, Error> {
        self.read_map().inspect_err(|e| {
            warn!(
                path = %self.path.display(),
                error = %e,
                "token file is corrupt, leaving it untouched"
            );
        })
    }

    fn write_map(&self, map: &serde_json::Map<String, serde_json::Value>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::TokenStorage(e.to_string()))?;
        }
        let raw =
            serde_json::to_string_pretty(map).map_err(|e| Error::TokenStorage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| Error::TokenStorage(e.to_string()))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<SecretString> {
        match self.read_map() {
            Ok(map) => map
                .get(TOKEN_KEY)
                .and_then(serde_json::Value::as_str)
                .filter(|t| !t.is_empty())
                .map(|t| SecretString::from(t.to_owned())),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable token file");
                None
            }
        }
    }

    fn store(&self, token: SecretString) -> Result<(), Error> {
        let mut map = self.read_existing()?;
        map.insert(
            TOKEN_KEY.to_owned(),
            serde_json::Value::String(token.expose_secret().to_owned()),
        );
        debug!(path = %self.path.display(), "persisting token");
        self.write_map(&map)
    }

    fn clear(&self) -> Result<(), Error> {
        let mut map = self.read_existing()?;
        if map.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}

// ── Navigation hooks ────────────────────────────────────────────────

/// Supplied by the hosting application so the client can react to an
/// unauthorized response without knowing how routing works.
pub trait Navigator: Send + Sync {
    /// Path of the page currently shown (e.g. `/checkout`).
    fn current_path(&self) -> String;

    /// Leave the current page for the login page.
    fn redirect_to_login(&self);
}

/// Returns `true` for the login and registration pages.
pub fn is_auth_page(path: &str) -> bool {
    matches_any(path, AUTH_PAGES)
}

/// Returns `true` for the login and registration endpoints.
pub fn is_auth_endpoint(path: &str) -> bool {
    matches_any(path, AUTH_ENDPOINTS)
}

/// Whether a 401 for `request_path` should drop the stored token.
/// `current_path` is `None` when no navigator is attached.
pub fn should_clear_on_unauthorized(current_path: Option<&str>, request_path: &str) -> bool {
    !is_auth_endpoint(request_path) && !current_path.is_some_and(is_auth_page)
}

fn matches_any(path: &str, candidates: &[&str]) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    candidates.iter().any(|c| {
        path == *c
            || path
                .strip_prefix(c)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
