// Inventory endpoints: items, categories, and stock-level queries.

use crate::client::BackofficeClient;
use crate::error::Error;
use crate::types::{
    CategoryCreate, CategoryDto, InventoryItemCreate, InventoryItemDto, InventoryItemUpdate,
    QuantityUpdate,
};

impl BackofficeClient {
    // ── Items ───────────────────────────────────────────────────────

    pub async fn list_inventory(&self) -> Result<Vec<InventoryItemDto>, Error> {
        self.get("api/inventory/items").await
    }

    pub async fn get_inventory_item(&self, id: i64) -> Result<InventoryItemDto, Error> {
        self.get(&format!("api/inventory/items/{id}")).await
    }

    pub async fn create_inventory_item(
        &self,
        body: &InventoryItemCreate,
    ) -> Result<InventoryItemDto, Error> {
        self.post("api/inventory/items", body).await
    }

    pub async fn update_inventory_item(
        &self,
        id: i64,
        body: &InventoryItemUpdate,
    ) -> Result<InventoryItemDto, Error> {
        self.put(&format!("api/inventory/items/{id}"), body).await
    }

    pub async fn delete_inventory_item(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("api/inventory/items/{id}")).await
    }

    /// Set the on-hand quantity directly (stock adjustment). Echoes the
    /// full item so derived fields can be recomputed from it.
    pub async fn set_inventory_quantity(
        &self,
        id: i64,
        quantity: u32,
    ) -> Result<InventoryItemDto, Error> {
        self.put(
            &format!("api/inventory/items/{id}/quantity"),
            &QuantityUpdate { quantity },
        )
        .await
    }

    /// Items at or below their reorder point, as computed server-side.
    pub async fn low_stock_items(&self) -> Result<Vec<InventoryItemDto>, Error> {
        self.get("api/inventory/items/low-stock").await
    }

    // ── Categories ──────────────────────────────────────────────────

    pub async fn list_categories(&self) -> Result<Vec<CategoryDto>, Error> {
        self.get("api/inventory/categories").await
    }

    pub async fn create_category(&self, body: &CategoryCreate) -> Result<CategoryDto, Error> {
        self.post("api/inventory/categories", body).await
    }
}
