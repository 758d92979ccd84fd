// ── Login page and session lifecycle ──

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use storefront_api::{LoginRequest, TokenStore, User};

use crate::error::CoreError;
use crate::notify::{Notification, Notifier};
use crate::resource::InFlight;
use crate::services::{AuthApi, AuthService};
use crate::validate::{FieldErrors, Validate, is_valid_email};

pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if errors.require("email", &self.email, "Email") && !is_valid_email(&self.email) {
            errors.insert("email", "Please enter a valid email address");
        }
        if self.password.expose_secret().is_empty() {
            errors.insert("password", "Password is required");
        }
        errors
    }
}

/// Turn an optional token from an auth response into a stored session.
pub(crate) fn store_session(tokens: &dyn TokenStore, token: Option<String>) -> Result<bool, CoreError> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(false);
    };
    tokens
        .store(SecretString::from(token))
        .map_err(|e| CoreError::normalize(e, "Could not save the session"))?;
    Ok(true)
}

pub struct LoginPage<S: AuthApi = AuthService> {
    service: S,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    submitting: InFlight,
}

impl<S: AuthApi> LoginPage<S> {
    pub fn new(service: S, tokens: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            tokens,
            notifier,
            submitting: InFlight::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn is_signed_in(&self) -> bool {
        self.tokens.load().is_some()
    }

    /// Validate, authenticate, and persist the returned token.
    pub async fn login(&self, form: &LoginForm) -> Result<User, CoreError> {
        let errors = form.validate();
        if !errors.is_empty() {
            self.notifier.notify(Notification::warning(errors.to_string()));
            return Err(CoreError::Validation(errors));
        }

        let _guard = self.submitting.begin("Login")?;
        let req = LoginRequest {
            email: form.email.trim().to_owned(),
            password: form.password.expose_secret().to_owned(),
        };
        let outcome = match self.service.login(&req).await {
            Ok(resp) => store_session(self.tokens.as_ref(), resp.token).and_then(|stored| {
                if stored {
                    Ok(resp.user)
                } else {
                    Err(CoreError::Request {
                        message: "Login response did not include a session token".into(),
                        status: None,
                    })
                }
            }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(user) => {
                info!(user = %user.id, "signed in");
                self.notifier
                    .notify(Notification::success(format!("Welcome back, {}", user.name)));
                Ok(user)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// End the session. The local token is dropped even when the server
    /// call fails.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if let Err(e) = self.service.logout().await {
            warn!(error = %e, "server logout failed; clearing local session anyway");
        }
        self.tokens
            .clear()
            .map_err(|e| CoreError::normalize(e, "Could not clear the session"))?;
        info!("signed out");
        self.notifier.notify(Notification::info("Signed out"));
        Ok(())
    }
}
