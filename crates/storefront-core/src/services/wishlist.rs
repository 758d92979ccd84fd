use std::sync::Arc;

use storefront_api::{ApiClient, ResourceId, WishlistItem};

use crate::error::{CoreError, Normalize};
use crate::resource::{CreateResource, DeleteResource, ListResource, Resource};
use crate::validate::{FieldErrors, Validate};

impl Resource for WishlistItem {
    const LABEL: &'static str = "Wishlist item";

    fn id(&self) -> &ResourceId {
        &self.product_id
    }
}

/// What gets saved: a product reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistDraft {
    pub product_id: String,
}

impl WishlistDraft {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
        }
    }
}

impl Validate for WishlistDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("product_id", &self.product_id, "Product");
        errors
    }
}

/// `/api/wishlist` bound to one client.
#[derive(Clone)]
pub struct WishlistService {
    client: Arc<ApiClient>,
}

impl WishlistService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl ListResource for WishlistService {
    type Item = WishlistItem;

    async fn list(&self) -> Result<Vec<WishlistItem>, CoreError> {
        self.client
            .list_wishlist()
            .await
            .or_fallback("Failed to fetch wishlist")
    }
}

impl CreateResource for WishlistService {
    type Draft = WishlistDraft;

    async fn create(&self, draft: &WishlistDraft) -> Result<WishlistItem, CoreError> {
        let id = ResourceId::from(draft.product_id.trim());
        self.client
            .add_to_wishlist(&id)
            .await
            .or_fallback("Failed to add to wishlist")
    }
}

impl DeleteResource for WishlistService {
    async fn delete(&self, id: &ResourceId) -> Result<(), CoreError> {
        self.client
            .remove_from_wishlist(id)
            .await
            .or_fallback("Failed to remove from wishlist")
    }
}
