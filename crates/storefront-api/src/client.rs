// Storefront API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection
// and the unauthorized-response policy. Endpoint groups (addresses, users,
// orders, ...) are inherent methods in sibling modules so this file stays
// focused on transport mechanics.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Error;
use crate::session::{Navigator, TokenStore, should_clear_on_unauthorized};
use crate::transport::TransportConfig;

/// Error bodies come as `{"message": ".."}` or `{"error": ".."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Async client for the storefront backend.
///
/// Build one per process and share it behind an `Arc`. The token store and
/// navigator are supplied by the host; the client reads the token before
/// every request and consults the navigator on every 401.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:5000`); endpoint
    /// paths such as `/api/addresses` are resolved against it.
    pub fn new(
        base_url: Url,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenStore>,
        navigator: Option<Arc<dyn Navigator>>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, tokens, navigator))
    }

    /// Wrap a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        tokens: Arc<dyn TokenStore>,
        navigator: Option<Arc<dyn Navigator>>,
    ) -> Self {
        Self {
            http,
            base_url,
            tokens,
            navigator,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token store this client reads from.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Whether a bearer token is currently stored.
    pub fn has_token(&self) -> bool {
        self.tokens.load().is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Resolve an absolute API path (`/api/...`) against the base URL,
    /// keeping any path prefix the base URL carries.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: Method, url: Url) -> Result<reqwest::RequestBuilder, Error> {
        let builder = self.http.request(method, url);
        match self.tokens.load() {
            Some(token) => Ok(builder.header(AUTHORIZATION, bearer(&token)?)),
            None => Ok(builder),
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let resp = self.request(Method::GET, url)?.send().await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let resp = self.request(Method::POST, url)?.json(body).send().await?;
        self.handle_response(path, resp).await
    }

    /// POST without a body, discarding whatever comes back.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let resp = self.request(Method::POST, url)?.send().await?;
        self.handle_empty(path, resp).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (multipart)");
        let resp = self.request(Method::POST, url)?.multipart(form).send().await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");
        let resp = self.request(Method::PUT, url)?.json(body).send().await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");
        let resp = self.request(Method::PATCH, url)?.send().await?;
        self.handle_response(path, resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");
        let resp = self.request(Method::DELETE, url)?.send().await?;
        self.handle_empty(path, resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(path, status, resp).await);
        }

        let body = resp.text().await?;
        // 204 and empty 200s still need to satisfy `()`-like targets.
        let body = if body.trim().is_empty() { "null".to_owned() } else { body };
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    async fn handle_empty(&self, path: &str, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(path, status, resp).await)
        }
    }

    async fn parse_error(&self, path: &str, status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty());

        if status == StatusCode::UNAUTHORIZED {
            self.on_unauthorized(path);
            return Error::Unauthorized { message };
        }

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Clear the session and leave for the login page, unless the 401 came
    /// from the login flow itself.
    fn on_unauthorized(&self, request_path: &str) {
        let current = self.navigator.as_ref().map(|n| n.current_path());
        if !should_clear_on_unauthorized(current.as_deref(), request_path) {
            debug!(?current, request_path, "401 on auth flow, leaving session untouched");
            return;
        }

        info!(?current, request_path, "session rejected, clearing stored token");
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "failed to clear stored token");
        }
        if let Some(navigator) = self.navigator.as_ref() {
            navigator.redirect_to_login();
        }
    }
}

fn bearer(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::InvalidToken(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}
