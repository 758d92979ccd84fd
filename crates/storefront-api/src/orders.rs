// Order history and checkout endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Order, PlaceOrderRequest, ResourceId};

impl ApiClient {
    /// `GET /api/orders`
    pub async fn list_orders(&self) -> Result<Vec<Order>, Error> {
        self.get("/api/orders").await
    }

    /// `GET /api/orders/{id}`
    pub async fn get_order(&self, id: &ResourceId) -> Result<Order, Error> {
        self.get(&format!("/api/orders/{id}")).await
    }

    /// `POST /api/orders`
    pub async fn place_order(&self, req: &PlaceOrderRequest) -> Result<Order, Error> {
        debug!(lines = req.items.len(), address = %req.address_id, "placing order");
        self.post("/api/orders", req).await
    }
}
