// Supplier collection store, plus pass-through access to the nested
// contact endpoints (contacts are not cached -- they are fetched per
// supplier when a detail view needs them).

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use opsdeck_api::types::{SupplierContactCreate, SupplierUpdate};
use opsdeck_api::BackofficeClient;

use crate::error::CoreError;
use crate::model::{Supplier, SupplierContact};
use crate::store::collection::{Keyed, ResourceCollection};
use crate::validate::{self, SupplierForm};

impl Keyed for Supplier {
    fn key(&self) -> i64 {
        self.id
    }
}

pub struct SupplierStore {
    client: Arc<BackofficeClient>,
    suppliers: ResourceCollection<Supplier>,
}

impl SupplierStore {
    pub fn new(client: Arc<BackofficeClient>) -> Self {
        Self {
            client,
            suppliers: ResourceCollection::new(),
        }
    }

    // ── Synchronization ─────────────────────────────────────────────

    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.suppliers.set_loading(true);
        let outcome = match self.client.list_suppliers().await {
            Ok(dtos) => {
                self.suppliers
                    .replace_all(dtos.into_iter().map(Supplier::from).collect());
                self.suppliers.clear_error();
                debug!(suppliers = self.suppliers.len(), "supplier refresh complete");
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.suppliers.record_error(&err);
                Err(err)
            }
        };
        self.suppliers.set_loading(false);
        outcome
    }

    pub async fn create(&self, form: &SupplierForm) -> Result<Arc<Supplier>, CoreError> {
        let body = validate::supplier_form(form)?;

        self.suppliers.set_loading(true);
        let outcome = match self.client.create_supplier(&body).await {
            Ok(dto) => {
                let stored = self.suppliers.upsert(Supplier::from(dto));
                self.suppliers.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.suppliers.record_error(&err);
                Err(err)
            }
        };
        self.suppliers.set_loading(false);
        outcome
    }

    pub async fn update(&self, id: i64, form: &SupplierForm) -> Result<Arc<Supplier>, CoreError> {
        let body = validate::supplier_form(form)?;
        let patch = SupplierUpdate {
            name: Some(body.name),
            contact_name: Some(body.contact_name),
            email: Some(body.email),
            phone: Some(body.phone),
            address: Some(body.address),
            city: Some(body.city),
            country: Some(body.country),
            postal_code: Some(body.postal_code),
            is_active: Some(body.is_active),
        };

        self.suppliers.set_loading(true);
        let outcome = match self.client.update_supplier(id, &patch).await {
            Ok(dto) => {
                let stored = self.suppliers.upsert(Supplier::from(dto));
                self.suppliers.clear_error();
                Ok(stored)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.suppliers.record_error(&err);
                Err(err)
            }
        };
        self.suppliers.set_loading(false);
        outcome
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        self.suppliers.set_loading(true);
        let outcome = match self.client.delete_supplier(id).await {
            Ok(()) => {
                self.suppliers.remove(id);
                self.suppliers.clear_error();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.suppliers.record_error(&err);
                Err(err)
            }
        };
        self.suppliers.set_loading(false);
        outcome
    }

    /// Fetch one supplier by id from the server and reconcile it into
    /// the collection.
    pub async fn fetch(&self, id: i64) -> Result<Arc<Supplier>, CoreError> {
        let dto = self.client.get_supplier(id).await.map_err(CoreError::from)?;
        Ok(self.suppliers.upsert(Supplier::from(dto)))
    }

    // ── Contacts (pass-through) ─────────────────────────────────────

    pub async fn contacts(&self, supplier_id: i64) -> Result<Vec<SupplierContact>, CoreError> {
        let dtos = self
            .client
            .supplier_contacts(supplier_id)
            .await
            .map_err(CoreError::from)?;
        Ok(dtos.into_iter().map(SupplierContact::from).collect())
    }

    pub async fn add_contact(
        &self,
        supplier_id: i64,
        contact: &SupplierContactCreate,
    ) -> Result<SupplierContact, CoreError> {
        let dto = self
            .client
            .add_supplier_contact(supplier_id, contact)
            .await
            .map_err(CoreError::from)?;
        Ok(SupplierContact::from(dto))
    }

    pub async fn update_contact(
        &self,
        supplier_id: i64,
        contact_id: i64,
        contact: &SupplierContactCreate,
    ) -> Result<SupplierContact, CoreError> {
        let dto = self
            .client
            .update_supplier_contact(supplier_id, contact_id, contact)
            .await
            .map_err(CoreError::from)?;
        Ok(SupplierContact::from(dto))
    }

    pub async fn delete_contact(&self, supplier_id: i64, contact_id: i64) -> Result<(), CoreError> {
        self.client
            .delete_supplier_contact(supplier_id, contact_id)
            .await
            .map_err(CoreError::from)
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn get(&self, id: i64) -> Option<Arc<Supplier>> {
        self.suppliers.get(id)
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<Supplier>>> {
        self.suppliers.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Supplier>>>> {
        self.suppliers.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.suppliers.is_loading()
    }

    pub fn watch_loading(&self) -> watch::Receiver<bool> {
        self.suppliers.watch_loading()
    }

    pub fn last_error(&self) -> Option<CoreError> {
        self.suppliers.last_error()
    }

    pub fn watch_error(&self) -> watch::Receiver<Option<CoreError>> {
        self.suppliers.watch_error()
    }

    /// Suppliers currently marked active, from the local snapshot.
    pub fn active(&self) -> Vec<Arc<Supplier>> {
        self.suppliers
            .snapshot()
            .iter()
            .filter(|supplier| supplier.is_active)
            .cloned()
            .collect()
    }
}
