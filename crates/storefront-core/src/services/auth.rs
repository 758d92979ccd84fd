use std::sync::Arc;

use storefront_api::{ApiClient, AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest};

use super::AuthApi;
use crate::error::{CoreError, Normalize};

/// Login, registration and recovery endpoints bound to one client.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl AuthApi for AuthService {
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, CoreError> {
        self.client.login(req).await.or_fallback("Login failed")
    }

    async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, CoreError> {
        self.client
            .register(req)
            .await
            .or_fallback("Registration failed")
    }

    async fn logout(&self) -> Result<(), CoreError> {
        self.client.logout().await.or_fallback("Logout failed")
    }

    async fn forgot_password(&self, email: &str) -> Result<String, CoreError> {
        self.client
            .forgot_password(email)
            .await
            .map(|r| r.message)
            .or_fallback("Failed to send reset link")
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<String, CoreError> {
        self.client
            .reset_password(req)
            .await
            .map(|r| r.message)
            .or_fallback("Failed to reset password")
    }

    async fn verify_email(&self, token: &str) -> Result<String, CoreError> {
        self.client
            .verify_email(token)
            .await
            .map(|r| r.message)
            .or_fallback("Email verification failed")
    }
}
