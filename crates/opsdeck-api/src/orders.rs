// Sales order endpoints.

use crate::client::BackofficeClient;
use crate::error::Error;
use crate::types::{OrderCreate, OrderDto, OrderStatus, OrderUpdate};

impl BackofficeClient {
    pub async fn list_orders(&self) -> Result<Vec<OrderDto>, Error> {
        self.get("api/order").await
    }

    pub async fn get_order(&self, id: i64) -> Result<OrderDto, Error> {
        self.get(&format!("api/order/{id}")).await
    }

    pub async fn create_order(&self, body: &OrderCreate) -> Result<OrderDto, Error> {
        self.post("api/order", body).await
    }

    pub async fn update_order(&self, id: i64, body: &OrderUpdate) -> Result<OrderDto, Error> {
        self.put(&format!("api/order/{id}"), body).await
    }

    pub async fn delete_order(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("api/order/{id}")).await
    }

    /// Server-side filter by order status.
    pub async fn orders_with_status(&self, status: OrderStatus) -> Result<Vec<OrderDto>, Error> {
        self.get(&format!("api/order/status/{status}")).await
    }
}
