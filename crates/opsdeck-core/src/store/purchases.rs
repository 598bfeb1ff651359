// Purchase order collection store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use opsdeck_api::types::{PurchaseStatus, PurchaseUpdate};
use opsdeck_api::BackofficeClient;

use crate::error::CoreError;
use crate::model::PurchaseOrder;
use crate::store::collection::{Keyed, ResourceCollection};
use crate::validate::{self, PurchaseForm};

impl Keyed for PurchaseOrder {
    fn key(&self) -> i64 {
        self.id
    }
}

pub struct PurchaseStore {
    client: Arc<BackofficeClient>,
    purchases: ResourceCollection<PurchaseOrder>,
}

impl PurchaseStore {
    pub fn new(client: Arc<BackofficeClient>) -> Self {
        Self {
            client,
            purchases: ResourceCollection::new(),
        }
    }

    // ── Synchronization ─────────────────────────────────────────────

    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.purchases.set_loading(true);
        let outcome = match self.client.list_purchases().await {
            Ok(dtos) => {
                self.purchases
                    .replace_all(dtos.into_iter().map(PurchaseOrder::from).collect());
                self.purchases.clear_error();
                debug!(
                    purchases = self.purchases.len(),
                    "purchase refresh complete"
                );
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.purchases.record_error(&err);
                Err(err)
            }
        };
        self.purchases.set_loading(false);
        outcome
    }

    pub async fn create(&self, form: &PurchaseForm) -> Result<Arc<PurchaseOrder>, CoreError> {
        let body = validate::purchase_form(form)?;

        self.purchases.set_loading(true);
        let outcome = match self.client.create_purchase(&body).await {
            Ok(dto) => {
                let stored = self.purchases.upsert(PurchaseOrder::from(dto));
                self.purchases.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.purchases.record_error(&err);
                Err(err)
            }
        };
        self.purchases.set_loading(false);
        outcome
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &PurchaseUpdate,
    ) -> Result<Arc<PurchaseOrder>, CoreError> {
        self.purchases.set_loading(true);
        let outcome = match self.client.update_purchase(id, patch).await {
            Ok(dto) => {
                let stored = self.purchases.upsert(PurchaseOrder::from(dto));
                self.purchases.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.purchases.record_error(&err);
                Err(err)
            }
        };
        self.purchases.set_loading(false);
        outcome
    }

    /// Advance the purchase through its lifecycle via the dedicated
    /// status endpoint.
    pub async fn set_status(
        &self,
        id: i64,
        status: PurchaseStatus,
    ) -> Result<Arc<PurchaseOrder>, CoreError> {
        self.purchases.set_loading(true);
        let outcome = match self.client.set_purchase_status(id, status).await {
            Ok(dto) => {
                let stored = self.purchases.upsert(PurchaseOrder::from(dto));
                self.purchases.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.purchases.record_error(&err);
                Err(err)
            }
        };
        self.purchases.set_loading(false);
        outcome
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        self.purchases.set_loading(true);
        let outcome = match self.client.delete_purchase(id).await {
            Ok(()) => {
                self.purchases.remove(id);
                self.purchases.clear_error();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.purchases.record_error(&err);
                Err(err)
            }
        };
        self.purchases.set_loading(false);
        outcome
    }

    /// Fetch one purchase order by id from the server and reconcile it
    /// into the collection.
    pub async fn fetch(&self, id: i64) -> Result<Arc<PurchaseOrder>, CoreError> {
        let dto = self.client.get_purchase(id).await.map_err(CoreError::from)?;
        Ok(self.purchases.upsert(PurchaseOrder::from(dto)))
    }

    /// Server-side status query; does not touch the cached collection.
    pub async fn fetch_with_status(
        &self,
        status: PurchaseStatus,
    ) -> Result<Vec<PurchaseOrder>, CoreError> {
        let dtos = self
            .client
            .purchases_with_status(status)
            .await
            .map_err(CoreError::from)?;
        Ok(dtos.into_iter().map(PurchaseOrder::from).collect())
    }

    /// Server-side supplier query; does not touch the cached collection.
    pub async fn fetch_for_supplier(
        &self,
        supplier_id: i64,
    ) -> Result<Vec<PurchaseOrder>, CoreError> {
        let dtos = self
            .client
            .purchases_for_supplier(supplier_id)
            .await
            .map_err(CoreError::from)?;
        Ok(dtos.into_iter().map(PurchaseOrder::from).collect())
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn get(&self, id: i64) -> Option<Arc<PurchaseOrder>> {
        self.purchases.get(id)
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<PurchaseOrder>>> {
        self.purchases.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<PurchaseOrder>>>> {
        self.purchases.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.purchases.is_loading()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.purchases.watch_loading()
    }

    pub fn last_error(&self) -> Option<CoreError> {
        self.purchases.last_error()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<CoreError>> {
        self.purchases.watch_error()
    }

    /// Local filter over the already-fetched snapshot.
    pub fn with_status(&self, status: PurchaseStatus) -> Vec<Arc<PurchaseOrder>> {
        self.purchases
            .snapshot()
            .iter()
            .filter(|purchase| purchase.status == status)
            .cloned()
            .collect()
    }
}
