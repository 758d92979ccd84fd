// ── Order history page ──

use std::sync::Arc;

use tokio::sync::watch;

use storefront_api::{Order, ResourceId};

use crate::error::CoreError;
use crate::notify::{Notification, Notifier};
use crate::resource::ResourceController;
use crate::services::{OrderApi, OrderService};

pub struct OrdersPage<S: OrderApi = OrderService> {
    controller: ResourceController<S>,
    selected: watch::Sender<Option<Order>>,
}

impl<S: OrderApi> OrdersPage<S> {
    pub fn new(service: S, notifier: Arc<dyn Notifier>) -> Self {
        let (selected, _) = watch::channel(None);
        Self {
            controller: ResourceController::new(service, notifier),
            selected,
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
        self.selected.send_replace(None);
    }

    pub fn orders(&self) -> Vec<Order> {
        self.controller.items()
    }

    /// Currently opened order, if any.
    pub fn selected(&self) -> Option<Order> {
        self.selected.borrow().clone()
    }

    /// Fetch one order in full and make it the selected one.
    pub async fn detail(&self, id: &ResourceId) -> Result<Order, CoreError> {
        match self.controller.service().get(id).await {
            Ok(order) => {
                self.selected.send_replace(Some(order.clone()));
                Ok(order)
            }
            Err(e) => {
                self.controller
                    .notifier()
                    .notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn close_detail(&self) {
        self.selected.send_replace(None);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::NotificationLog;
    use crate::testing::{FakeOrders, order};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn lists_in_server_order_and_opens_detail() {
        let log = Arc::new(NotificationLog::new());
        let page = OrdersPage::new(FakeOrders::with(vec![order(3), order(1)]), log);
        page.mount().await.unwrap();

        let ids: Vec<String> = page.orders().iter().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, vec!["3".to_owned(), "1".to_owned()]);

        page.detail(&ResourceId::from(1_u64)).await.unwrap();
        assert_eq!(page.selected().unwrap().id, ResourceId::from(1_u64));
        page.close_detail();
        assert!(page.selected().is_none());
    }

    #[tokio::test]
    async fn missing_order_is_reported() {
        let log = Arc::new(NotificationLog::new());
        let page = OrdersPage::new(FakeOrders::default(), log.clone());

        let err = page.detail(&ResourceId::from(404_u64)).await.unwrap_err();
        assert_eq!(err.to_string(), "Order '404' not found");
        assert_eq!(log.len(), 1);
    }
}
