// ── Collection state stores ──
//
// One store per resource family. Each owns its fetched collection
// exclusively; views read `Arc` snapshots or subscribe to watch
// channels and invoke the mutation methods -- they never mutate
// collection memory directly.

mod collection;
mod inventory;
mod orders;
mod purchases;
mod reports;
mod suppliers;

pub use collection::Keyed;
pub use inventory::InventoryStore;
pub use orders::OrderStore;
pub use purchases::PurchaseStore;
pub use reports::ReportStore;
pub use suppliers::SupplierStore;

use std::sync::Arc;

use opsdeck_api::BackofficeClient;

/// All stores wired to one client.
pub struct Stores {
    pub inventory: InventoryStore,
    pub suppliers: SupplierStore,
    pub orders: OrderStore,
    pub purchases: PurchaseStore,
    pub reports: ReportStore,
}

impl Stores {
    pub fn new(client: Arc<BackofficeClient>) -> Self {
        Self {
            inventory: InventoryStore::new(Arc::clone(&client)),
            suppliers: SupplierStore::new(Arc::clone(&client)),
            orders: OrderStore::new(Arc::clone(&client)),
            purchases: PurchaseStore::new(Arc::clone(&client)),
            reports: ReportStore::new(client),
        }
    }

    /// Startup refresh: the four collections load concurrently and
    /// independently; one failing does not abort the others. Each
    /// store records its own error for the view to render.
    pub async fn refresh_all(&self) {
        let _ = tokio::join!(
            self.inventory.refresh(),
            self.suppliers.refresh(),
            self.orders.refresh(),
            self.purchases.refresh(),
        );
    }
}
