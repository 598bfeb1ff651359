// Inventory collection store.
//
// Owns the fetched inventory list. Every record entering the collection
// passes through `InventoryItem::from`, so the derived stock status is
// always computed from server-confirmed quantities -- client patches are
// never merged into derived fields.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use opsdeck_api::types::InventoryItemUpdate;
use opsdeck_api::BackofficeClient;

use crate::error::CoreError;
use crate::model::{InventoryItem, StockStatus};
use crate::store::collection::{Keyed, ResourceCollection};
use crate::validate::{self, InventoryForm};

impl Keyed for InventoryItem {
    fn key(&self) -> i64 {
        self.id
    }
}

pub struct InventoryStore {
    client: Arc<BackofficeClient>,
    items: ResourceCollection<InventoryItem>,
}

impl InventoryStore {
    pub fn new(client: Arc<BackofficeClient>) -> Self {
        Self {
            client,
            items: ResourceCollection::new(),
        }
    }

    // ── Synchronization ─────────────────────────────────────────────

    /// Fetch the full collection and replace local state wholesale.
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.items.set_loading(true);
        let outcome = match self.client.list_inventory().await {
            Ok(dtos) => {
                self.items
                    .replace_all(dtos.into_iter().map(InventoryItem::from).collect());
                self.items.clear_error();
                debug!(items = self.items.len(), "inventory refresh complete");
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.items.record_error(&err);
                Err(err)
            }
        };
        self.items.set_loading(false);
        outcome
    }

    /// Validate the form, create the item, and append the server's
    /// authoritative record. The server assigns the identity.
    pub async fn create(&self, form: &InventoryForm) -> Result<Arc<InventoryItem>, CoreError> {
        let body = validate::inventory_form(form)?;

        self.items.set_loading(true);
        let outcome = match self.client.create_inventory_item(&body).await {
            Ok(dto) => {
                let stored = self.items.upsert(InventoryItem::from(dto));
                self.items.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.items.record_error(&err);
                Err(err)
            }
        };
        self.items.set_loading(false);
        outcome
    }

    /// Validate the form and replace the record with the server's echo.
    pub async fn update(
        &self,
        id: i64,
        form: &InventoryForm,
    ) -> Result<Arc<InventoryItem>, CoreError> {
        let body = validate::inventory_form(form)?;
        let patch = InventoryItemUpdate {
            name: Some(body.name),
            sku: Some(body.sku),
            category: Some(body.category),
            description: Some(body.description),
            price: Some(body.price),
            cost_price: Some(body.cost_price),
            quantity: Some(body.quantity),
            reorder_point: Some(body.reorder_point),
            location: Some(body.location),
            supplier_id: Some(body.supplier_id),
            image_url: body.image_url,
        };
        self.apply_update(self.client.update_inventory_item(id, &patch))
            .await
    }

    /// Stock adjustment: set the on-hand quantity directly.
    pub async fn set_quantity(
        &self,
        id: i64,
        quantity: u32,
    ) -> Result<Arc<InventoryItem>, CoreError> {
        self.apply_update(self.client.set_inventory_quantity(id, quantity))
            .await
    }

    /// Delete the record; it leaves the collection only on success.
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        self.items.set_loading(true);
        let outcome = match self.client.delete_inventory_item(id).await {
            Ok(()) => {
                self.items.remove(id);
                self.items.clear_error();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.items.record_error(&err);
                Err(err)
            }
        };
        self.items.set_loading(false);
        outcome
    }

    /// Fetch one record by id from the server and reconcile it into the
    /// collection.
    pub async fn fetch(&self, id: i64) -> Result<Arc<InventoryItem>, CoreError> {
        let dto = self
            .client
            .get_inventory_item(id)
            .await
            .map_err(CoreError::from)?;
        Ok(self.items.upsert(InventoryItem::from(dto)))
    }

    /// Server-side low-stock query; does not touch the cached collection.
    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, CoreError> {
        let dtos = self.client.low_stock_items().await.map_err(CoreError::from)?;
        Ok(dtos.into_iter().map(InventoryItem::from).collect())
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn get(&self, id: i64) -> Option<Arc<InventoryItem>> {
        self.items.get(id)
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<InventoryItem>>> {
        self.items.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<InventoryItem>>>> {
        self.items.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.items.is_loading()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.items.watch_loading()
    }

    pub fn last_error(&self) -> Option<CoreError> {
        self.items.last_error()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<CoreError>> {
        self.items.watch_error()
    }

    /// Local filter over the already-fetched snapshot.
    pub fn with_status(&self, status: StockStatus) -> Vec<Arc<InventoryItem>> {
        self.items
            .snapshot()
            .iter()
            .filter(|item| item.status == status)
            .cloned()
            .collect()
    }

    /// Items sourced from one supplier, from the local snapshot.
    pub fn for_supplier(&self, supplier_id: i64) -> Vec<Arc<InventoryItem>> {
        self.items
            .snapshot()
            .iter()
            .filter(|item| item.supplier_id == supplier_id)
            .cloned()
            .collect()
    }

    // ── Private helpers ─────────────────────────────────────────────

    async fn apply_update(
        &self,
        call: impl std::future::Future<
            Output = Result<opsdeck_api::types::InventoryItemDto, opsdeck_api::Error>,
        >,
    ) -> Result<Arc<InventoryItem>, CoreError> {
        self.items.set_loading(true);
        let outcome = match call.await {
            Ok(dto) => {
                let stored = self.items.upsert(InventoryItem::from(dto));
                self.items.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.items.record_error(&err);
                Err(err)
            }
        };
        self.items.set_loading(false);
        outcome
    }
}
