// Sales order collection store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use opsdeck_api::types::{OrderStatus, OrderUpdate};
use opsdeck_api::BackofficeClient;

use crate::error::CoreError;
use crate::model::SalesOrder;
use crate::store::collection::{Keyed, ResourceCollection};
use crate::validate::{self, OrderForm};

impl Keyed for SalesOrder {
    fn key(&self) -> i64 {
        self.id
    }
}

pub struct OrderStore {
    client: Arc<BackofficeClient>,
    orders: ResourceCollection<SalesOrder>,
}

impl OrderStore {
    pub fn new(client: Arc<BackofficeClient>) -> Self {
        Self {
            client,
            orders: ResourceCollection::new(),
        }
    }

    // ── Synchronization ─────────────────────────────────────────────

    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.orders.set_loading(true);
        let outcome = match self.client.list_orders().await {
            Ok(dtos) => {
                self.orders
                    .replace_all(dtos.into_iter().map(SalesOrder::from).collect());
                self.orders.clear_error();
                debug!(orders = self.orders.len(), "order refresh complete");
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.orders.record_error(&err);
                Err(err)
            }
        };
        self.orders.set_loading(false);
        outcome
    }

    pub async fn create(&self, form: &OrderForm) -> Result<Arc<SalesOrder>, CoreError> {
        let body = validate::order_form(form)?;

        self.orders.set_loading(true);
        let outcome = match self.client.create_order(&body).await {
            Ok(dto) => {
                let stored = self.orders.upsert(SalesOrder::from(dto));
                self.orders.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.orders.record_error(&err);
                Err(err)
            }
        };
        self.orders.set_loading(false);
        outcome
    }

    /// Apply a partial update; the collection takes the server's echo,
    /// so the derived total always reflects the confirmed line items.
    pub async fn update(&self, id: i64, patch: &OrderUpdate) -> Result<Arc<SalesOrder>, CoreError> {
        self.orders.set_loading(true);
        let outcome = match self.client.update_order(id, patch).await {
            Ok(dto) => {
                let stored = self.orders.upsert(SalesOrder::from(dto));
                self.orders.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.orders.record_error(&err);
                Err(err)
            }
        };
        self.orders.set_loading(false);
        outcome
    }

    /// Convenience wrapper for the common status-only update.
    pub async fn set_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Arc<SalesOrder>, CoreError> {
        self.update(
            id,
            &OrderUpdate {
                status: Some(status),
                ..OrderUpdate::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        self.orders.set_loading(true);
        let outcome = match self.client.delete_order(id).await {
            Ok(()) => {
                self.orders.remove(id);
                self.orders.clear_error();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.orders.record_error(&err);
                Err(err)
            }
        };
        self.orders.set_loading(false);
        outcome
    }

    /// Fetch one order by id from the server and reconcile it into the
    /// collection.
    pub async fn fetch(&self, id: i64) -> Result<Arc<SalesOrder>, CoreError> {
        let dto = self.client.get_order(id).await.map_err(CoreError::from)?;
        Ok(self.orders.upsert(SalesOrder::from(dto)))
    }

    /// Server-side status query; does not touch the cached collection.
    pub async fn fetch_with_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<SalesOrder>, CoreError> {
        let dtos = self
            .client
            .orders_with_status(status)
            .await
            .map_err(CoreError::from)?;
        Ok(dtos.into_iter().map(SalesOrder::from).collect())
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn get(&self, id: i64) -> Option<Arc<SalesOrder>> {
        self.orders.get(id)
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<SalesOrder>>> {
        self.orders.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<SalesOrder>>>> {
        self.orders.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.orders.is_loading()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.orders.watch_loading()
    }

    pub fn last_error(&self) -> Option<CoreError> {
        self.orders.last_error()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<CoreError>> {
        self.orders.watch_error()
    }

    /// Local filter over the already-fetched snapshot.
    pub fn with_status(&self, status: OrderStatus) -> Vec<Arc<SalesOrder>> {
        self.orders
            .snapshot()
            .iter()
            .filter(|order| order.status == status)
            .cloned()
            .collect()
    }

    /// Orders for one customer, from the local snapshot.
    pub fn for_customer(&self, customer: &str) -> Vec<Arc<SalesOrder>> {
        self.orders
            .snapshot()
            .iter()
            .filter(|order| order.customer == customer)
            .cloned()
            .collect()
    }
}
