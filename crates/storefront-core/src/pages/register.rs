// ── Registration page ──

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use storefront_api::{RegisterRequest, TokenStore, User};

use super::login::store_session;
use crate::error::CoreError;
use crate::notify::{Notification, Notifier};
use crate::resource::InFlight;
use crate::services::{AuthApi, AuthService};
use crate::validate::{FieldErrors, Validate, check_new_password, is_valid_email, is_valid_phone};

pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    /// Optional; omitted from the request when blank.
    pub phone: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name");
        if errors.require("email", &self.email, "Email") && !is_valid_email(&self.email) {
            errors.insert("email", "Please enter a valid email address");
        }
        if self.password.expose_secret().is_empty() {
            errors.insert("password", "Password is required");
        }
        check_new_password(
            &mut errors,
            "password",
            "confirm_password",
            self.password.expose_secret(),
            self.confirm_password.expose_secret(),
        );
        if !self.phone.trim().is_empty() && !is_valid_phone(&self.phone) {
            errors.insert("phone", "Phone number is invalid");
        }
        errors
    }
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub user: User,
    /// False when the backend wants the email verified before issuing a
    /// session.
    pub signed_in: bool,
}

pub struct RegisterPage<S: AuthApi = AuthService> {
    service: S,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    submitting: InFlight,
}

impl<S: AuthApi> RegisterPage<S> {
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

    pub async fn register(&self, form: &RegisterForm) -> Result<Registered, CoreError> {
        let errors = form.validate();
        if !errors.is_empty() {
            self.notifier.notify(Notification::warning(errors.to_string()));
            return Err(CoreError::Validation(errors));
        }

        let _guard = self.submitting.begin("Registration")?;
        let phone = form.phone.trim();
        let req = RegisterRequest {
            name: form.name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            password: form.password.expose_secret().to_owned(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
        };

        let result = match self.service.register(&req).await {
            Ok(resp) => store_session(self.tokens.as_ref(), resp.token).map(|signed_in| Registered {
                user: resp.user,
                signed_in,
            }),
            Err(e) => Err(e),
        };

        match result {
            Ok(registered) => {
                info!(user = %registered.user.id, signed_in = registered.signed_in, "registered");
                let message = if registered.signed_in {
                    "Account created"
                } else {
                    "Account created. Check your email to verify your address."
                };
                self.notifier.notify(Notification::success(message));
                Ok(registered)
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
    use crate::testing::FakeAuth;
    use crate::notify::NotificationLog;
    use storefront_api::MemoryTokenStore;

    fn form(phone: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: SecretString::from("analytical".to_owned()),
            confirm_password: SecretString::from(confirm.to_owned()),
            phone: phone.into(),
        }
    }

    fn register_page() -> RegisterPage<FakeAuth> {
        RegisterPage::new(
            FakeAuth::default(),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(NotificationLog::new()),
        )
    }

    #[tokio::test]
    async fn blank_phone_is_omitted() {
        let page = register_page();
        let registered = page.register(&form("  ", "analytical")).await.unwrap();
        assert!(!registered.signed_in);
        assert_eq!(page.service().last_register().unwrap().phone, None);
    }

    #[tokio::test]
    async fn mismatched_confirmation_blocks_submit() {
        let page = register_page();
        let err = page.register(&form("", "analytic")).await.unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("confirm_password"),
            Some("Passwords do not match")
        );
        assert_eq!(FakeAuth::calls(&page.service().register_calls), 0);
    }
}
