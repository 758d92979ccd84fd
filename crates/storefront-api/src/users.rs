// Profile endpoints
//
// Everything under `/api/users` that needs an existing session.

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AvatarFile, AvatarResponse, ChangePasswordRequest, MessageResponse, UpdateProfileRequest, User,
};

impl ApiClient {
    /// `GET /api/users/me`
    pub async fn me(&self) -> Result<User, Error> {
        self.get("/api/users/me").await
    }

    /// `PUT /api/users/profile`
    pub async fn update_profile(&self, req: &UpdateProfileRequest) -> Result<User, Error> {
        debug!("updating profile");
        self.put("/api/users/profile", req).await
    }

    /// `PUT /api/users/password`
    pub async fn change_password(
        &self,
        req: &ChangePasswordRequest,
    ) -> Result<MessageResponse, Error> {
        debug!("changing password");
        self.put("/api/users/password", req).await
    }

    /// `POST /api/users/avatar` as `multipart/form-data`, file in the
    /// `avatar` field.
    pub async fn upload_avatar(&self, file: &AvatarFile) -> Result<AvatarResponse, Error> {
        debug!(file = %file.file_name, size = file.size(), "uploading avatar");
        let part = Part::stream(reqwest::Body::from(file.bytes.clone()))
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        let form = Form::new().part("avatar", part);
        self.post_multipart("/api/users/avatar", form).await
    }

    /// `DELETE /api/users/avatar`
    pub async fn remove_avatar(&self) -> Result<(), Error> {
        debug!("removing avatar");
        self.delete("/api/users/avatar").await
    }
}
