// Authentication endpoints
//
// Login stores nothing by itself; the caller decides what to do with the
// returned token (see `storefront-core`'s login page).

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, ResetPasswordRequest,
};

impl ApiClient {
    /// `POST /api/users/register`
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, Error> {
        debug!(email = %req.email, "registering");
        self.post("/api/users/register", req).await
    }

    /// `POST /api/users/login`
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, Error> {
        debug!(email = %req.email, "logging in");
        self.post("/api/users/login", req).await
    }

    /// `POST /api/users/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.post_empty("/api/users/logout").await
    }

    /// `POST /api/users/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, Error> {
        debug!(email, "requesting password reset");
        self.post("/api/users/forgot-password", &json!({ "email": email }))
            .await
    }

    /// `POST /api/users/reset-password`
    pub async fn reset_password(
        &self,
        req: &ResetPasswordRequest,
    ) -> Result<MessageResponse, Error> {
        debug!("resetting password");
        self.post("/api/users/reset-password", req).await
    }

    /// `POST /api/auth/verify-email`
    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse, Error> {
        debug!("verifying email");
        self.post("/api/auth/verify-email", &json!({ "token": token }))
            .await
    }
}
