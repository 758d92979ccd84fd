// Wishlist endpoints

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ResourceId, WishlistItem};

impl ApiClient {
    /// `GET /api/wishlist`
    pub async fn list_wishlist(&self) -> Result<Vec<WishlistItem>, Error> {
        self.get("/api/wishlist").await
    }

    /// `POST /api/wishlist` with `{"productId": ..}`
    pub async fn add_to_wishlist(&self, product_id: &ResourceId) -> Result<WishlistItem, Error> {
        debug!(%product_id, "adding to wishlist");
        self.post("/api/wishlist", &json!({ "productId": product_id }))
            .await
    }

    /// `DELETE /api/wishlist/{productId}`
    pub async fn remove_from_wishlist(&self, product_id: &ResourceId) -> Result<(), Error> {
        debug!(%product_id, "removing from wishlist");
        self.delete(&format!("/api/wishlist/{product_id}")).await
    }
}
