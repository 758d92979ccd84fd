// ── Wishlist page ──

use std::sync::Arc;

use storefront_api::{ResourceId, WishlistItem};

use crate::error::CoreError;
use crate::notify::{Confirm, Notifier};
use crate::resource::{Deleted, ResourceController};
use crate::services::{WishlistApi, WishlistDraft, WishlistService};

pub struct WishlistPage<S: WishlistApi = WishlistService> {
    controller: ResourceController<S>,
}

impl<S: WishlistApi> WishlistPage<S> {
    pub fn new(service: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            controller: ResourceController::new(service, notifier),
        }
    }

    pub fn controller(&self) -> &ResourceController<S> {
        &self.controller
    }

    pub async fn mount(&self) -> Result<(), CoreError> {
        self.controller.mount().await
    }

    pub fn unmount(&self) {
        self.controller.unmount();
    }

    pub fn items(&self) -> Vec<WishlistItem> {
        self.controller.items()
    }

    pub fn contains(&self, product_id: &ResourceId) -> bool {
        self.controller.find(product_id).is_some()
    }

    /// Save a product. Already-saved products are left alone.
    pub async fn add(&self, product_id: &str) -> Result<Option<WishlistItem>, CoreError> {
        if !product_id.trim().is_empty() && self.contains(&ResourceId::from(product_id.trim())) {
            return Ok(None);
        }
        self.controller
            .create(&WishlistDraft::new(product_id))
            .await
            .map(Some)
    }

    pub async fn remove(
        &self,
        product_id: &ResourceId,
        confirm: &dyn Confirm,
    ) -> Result<Deleted, CoreError> {
        self.controller.delete(product_id, confirm).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::NotificationLog;
    use crate::testing::FakeWishlist;

    fn wishlist() -> WishlistPage<FakeWishlist> {
        WishlistPage::new(FakeWishlist::default(), Arc::new(NotificationLog::new()))
    }

    #[tokio::test]
    async fn add_then_remove() {
        let page = wishlist();
        page.mount().await.unwrap();

        let added = page.add("p-42").await.unwrap().unwrap();
        assert_eq!(added.product_id, ResourceId::from("p-42"));
        assert!(page.contains(&ResourceId::from("p-42")));

        page.remove(&ResourceId::from("p-42"), &|_: &str| true)
            .await
            .unwrap();
        assert!(page.items().is_empty());
    }

    #[tokio::test]
    async fn duplicate_add_is_skipped() {
        let page = wishlist();
        page.mount().await.unwrap();
        page.add("p-1").await.unwrap();
        assert!(page.add("p-1").await.unwrap().is_none());
        assert_eq!(FakeWishlist::calls(&page.controller().service().create_calls), 1);
    }

    #[tokio::test]
    async fn blank_product_is_refused() {
        let page = wishlist();
        let err = page.add("  ").await.unwrap_err();
        assert!(err.field_errors().unwrap().contains("product_id"));
        assert_eq!(FakeWishlist::calls(&page.controller().service().create_calls), 0);
    }

    #[tokio::test]
    async fn declined_remove_keeps_item() {
        let page = wishlist();
        page.mount().await.unwrap();
        page.add("p-1").await.unwrap();

        let outcome = page
            .remove(&ResourceId::from("p-1"), &|_: &str| false)
            .await
            .unwrap();
        assert_eq!(outcome, Deleted::Declined);
        assert_eq!(page.items().len(), 1);
        assert_eq!(FakeWishlist::calls(&page.controller().service().delete_calls), 0);
    }
}
