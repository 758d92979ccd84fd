use std::sync::Arc;

use storefront_api::{ApiClient, AvatarFile, ChangePasswordRequest, UpdateProfileRequest, User};

use super::ProfileApi;
use crate::error::{CoreError, Normalize};

/// `/api/users/*` profile endpoints bound to one client.
#[derive(Clone)]
pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl ProfileApi for UserService {
    async fn me(&self) -> Result<User, CoreError> {
        self.client
            .me()
            .await
            .or_fallback("Failed to fetch profile")
    }

    async fn update_profile(&self, req: &UpdateProfileRequest) -> Result<User, CoreError> {
        self.client
            .update_profile(req)
            .await
            .or_fallback("Failed to update profile")
    }

    async fn change_password(&self, req: &ChangePasswordRequest) -> Result<(), CoreError> {
        self.client
            .change_password(req)
            .await
            .map(drop)
            .or_fallback("Failed to change password")
    }

    async fn upload_avatar(&self, file: &AvatarFile) -> Result<Option<String>, CoreError> {
        self.client
            .upload_avatar(file)
            .await
            .map(|r| r.avatar)
            .or_fallback("Failed to upload photo")
    }

    async fn remove_avatar(&self) -> Result<(), CoreError> {
        self.client
            .remove_avatar()
            .await
            .or_fallback("Failed to remove photo")
    }
}
