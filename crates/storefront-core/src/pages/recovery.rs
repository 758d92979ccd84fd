// ── Password recovery and email verification ──

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use storefront_api::ResetPasswordRequest;

use crate::error::CoreError;
use crate::notify::{Notification, Notifier};
use crate::resource::InFlight;
use crate::services::{AuthApi, AuthService};
use crate::validate::{FieldErrors, Validate, check_new_password, is_valid_email};

pub struct ForgotPasswordForm {
    pub email: String,
}

impl Validate for ForgotPasswordForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if errors.require("email", &self.email, "Email") && !is_valid_email(&self.email) {
            errors.insert("email", "Please enter a valid email address");
        }
        errors
    }
}

/// Reset link token plus the new password.
pub struct ResetPasswordForm {
    pub token: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl Validate for ResetPasswordForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("token", &self.token, "Reset token");
        check_new_password(
            &mut errors,
            "password",
            "confirm_password",
            self.password.expose_secret(),
            self.confirm_password.expose_secret(),
        );
        errors
    }
}

pub struct RecoveryPage<S: AuthApi = AuthService> {
    service: S,
    notifier: Arc<dyn Notifier>,
    submitting: InFlight,
}

impl<S: AuthApi> RecoveryPage<S> {
    pub fn new(service: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            submitting: InFlight::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Ask for a reset link. Returns the server's acknowledgement.
    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> Result<String, CoreError> {
        self.check(form)?;
        let _guard = self.submitting.begin("Password reset request")?;
        let email = form.email.trim();
        let result = self.service.forgot_password(email).await;
        self.announce(result, "If that email is registered, a reset link is on its way")
    }

    pub async fn reset_password(&self, form: &ResetPasswordForm) -> Result<String, CoreError> {
        self.check(form)?;
        let _guard = self.submitting.begin("Password reset")?;
        let req = ResetPasswordRequest {
            token: form.token.trim().to_owned(),
            password: form.password.expose_secret().to_owned(),
        };
        let result = self.service.reset_password(&req).await;
        self.announce(result, "Password has been reset")
    }

    pub async fn verify_email(&self, token: &str) -> Result<String, CoreError> {
        let mut errors = FieldErrors::new();
        errors.require("token", token, "Verification token");
        if let Err(e) = errors.into_result() {
            self.notifier.notify(Notification::warning(e.to_string()));
            return Err(e);
        }
        let _guard = self.submitting.begin("Email verification")?;
        let result = self.service.verify_email(token.trim()).await;
        self.announce(result, "Email verified")
    }

    fn check(&self, form: &impl Validate) -> Result<(), CoreError> {
        form.validate().into_result().inspect_err(|e| {
            self.notifier.notify(Notification::warning(e.to_string()));
        })
    }

    /// Empty acknowledgements fall back to `default_message`.
    fn announce(
        &self,
        result: Result<String, CoreError>,
        default_message: &str,
    ) -> Result<String, CoreError> {
        match result {
            Ok(message) => {
                let message = if message.trim().is_empty() {
                    default_message.to_owned()
                } else {
                    message
                };
                self.notifier.notify(Notification::success(message.clone()));
                Ok(message)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::NotificationLog;
    use crate::testing::FakeAuth;

    fn recovery() -> RecoveryPage<FakeAuth> {
        RecoveryPage::new(FakeAuth::default(), Arc::new(NotificationLog::new()))
    }

    #[tokio::test]
    async fn forgot_password_returns_server_message() {
        let page = recovery();
        let msg = page
            .forgot_password(&ForgotPasswordForm {
                email: "ada@example.com".into(),
            })
            .await
            .unwrap();
        assert_eq!(msg, "Reset link sent");
    }

    #[tokio::test]
    async fn reset_requires_token_and_strong_password() {
        let page = recovery();
        let err = page
            .reset_password(&ResetPasswordForm {
                token: String::new(),
                password: SecretString::from("short".to_owned()),
                confirm_password: SecretString::from("short".to_owned()),
            })
            .await
            .unwrap_err();
        let fields = err.field_errors().unwrap();
        assert!(fields.contains("token"));
        assert!(fields.contains("password"));
        assert_eq!(FakeAuth::calls(&page.service().recovery_calls), 0);
    }

    #[tokio::test]
    async fn blank_verification_token_is_refused() {
        let page = recovery();
        assert!(page.verify_email(" ").await.unwrap_err().is_validation());
        assert_eq!(page.verify_email("abc").await.unwrap(), "Email verified");
    }
}
