// Address book endpoints
//
// `/api/addresses` is scoped to the authenticated user by the bearer token.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Address, AddressInput, ResourceId};

impl ApiClient {
    /// `GET /api/addresses`
    pub async fn list_addresses(&self) -> Result<Vec<Address>, Error> {
        self.get("/api/addresses").await
    }

    /// `GET /api/addresses/{id}`
    pub async fn get_address(&self, id: &ResourceId) -> Result<Address, Error> {
        self.get(&format!("/api/addresses/{id}")).await
    }

    /// `POST /api/addresses`
    pub async fn create_address(&self, input: &AddressInput) -> Result<Address, Error> {
        debug!(city = %input.city, is_default = input.is_default, "creating address");
        self.post("/api/addresses", input).await
    }

    /// `PUT /api/addresses/{id}` with the full record.
    pub async fn update_address(
        &self,
        id: &ResourceId,
        input: &AddressInput,
    ) -> Result<Address, Error> {
        debug!(%id, "updating address");
        self.put(&format!("/api/addresses/{id}"), input).await
    }

    /// `DELETE /api/addresses/{id}`
    pub async fn delete_address(&self, id: &ResourceId) -> Result<(), Error> {
        debug!(%id, "deleting address");
        self.delete(&format!("/api/addresses/{id}")).await
    }

    /// `PATCH /api/addresses/{id}/default`
    ///
    /// The response body is ignored; callers re-fetch the list to observe
    /// which record the backend now treats as default.
    pub async fn set_default_address(&self, id: &ResourceId) -> Result<(), Error> {
        debug!(%id, "setting default address");
        let _: serde_json::Value = self
            .patch_empty(&format!("/api/addresses/{id}/default"))
            .await?;
        Ok(())
    }
}
