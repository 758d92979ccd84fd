use std::sync::Arc;

use storefront_api::{Address, AddressInput, ApiClient, ResourceId};

use super::AddressApi;
use crate::error::{CoreError, Normalize};
use crate::resource::{CreateResource, DeleteResource, ListResource, Resource, UpdateResource};

impl Resource for Address {
    const LABEL: &'static str = "Address";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// `/api/addresses` bound to one client.
#[derive(Clone)]
pub struct AddressService {
    client: Arc<ApiClient>,
}

impl AddressService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl ListResource for AddressService {
    type Item = Address;

    async fn list(&self) -> Result<Vec<Address>, CoreError> {
        self.client
            .list_addresses()
            .await
            .or_fallback("Failed to fetch addresses")
    }
}

impl CreateResource for AddressService {
    type Draft = AddressInput;

    async fn create(&self, draft: &AddressInput) -> Result<Address, CoreError> {
        self.client
            .create_address(draft)
            .await
            .or_fallback("Failed to add address")
    }
}

impl UpdateResource for AddressService {
    async fn update(&self, id: &ResourceId, draft: &AddressInput) -> Result<Address, CoreError> {
        self.client
            .update_address(id, draft)
            .await
            .or_fallback("Failed to update address")
    }
}

impl DeleteResource for AddressService {
    async fn delete(&self, id: &ResourceId) -> Result<(), CoreError> {
        self.client
            .delete_address(id)
            .await
            .or_fallback("Failed to delete address")
    }
}

impl AddressApi for AddressService {
    async fn set_default(&self, id: &ResourceId) -> Result<(), CoreError> {
        self.client
            .set_default_address(id)
            .await
            .or_fallback("Failed to set default address")
    }
}
