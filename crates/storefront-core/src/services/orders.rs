use std::sync::Arc;

use storefront_api::{ApiClient, Order, PlaceOrderRequest, ResourceId};

use super::{CheckoutApi, OrderApi};
use crate::error::{CoreError, Normalize};
use crate::resource::{ListResource, Resource};

impl Resource for Order {
    const LABEL: &'static str = "Order";

    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// `/api/orders` bound to one client.
#[derive(Clone)]
pub struct OrderService {
    client: Arc<ApiClient>,
}

impl OrderService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl ListResource for OrderService {
    type Item = Order;

    async fn list(&self) -> Result<Vec<Order>, CoreError> {
        self.client
            .list_orders()
            .await
            .or_fallback("Failed to fetch orders")
    }
}

impl OrderApi for OrderService {
    async fn get(&self, id: &ResourceId) -> Result<Order, CoreError> {
        match self.client.get_order(id).await {
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                resource: Order::LABEL,
                id: id.to_string(),
            }),
            other => other.or_fallback("Failed to fetch order"),
        }
    }
}

impl CheckoutApi for OrderService {
    async fn place_order(&self, req: &PlaceOrderRequest) -> Result<Order, CoreError> {
        self.client
            .place_order(req)
            .await
            .or_fallback("Failed to place order")
    }
}
