// Supplier endpoints, including nested supplier contacts.

use crate::client::BackofficeClient;
use crate::error::Error;
use crate::types::{
    SupplierContactCreate, SupplierContactDto, SupplierCreate, SupplierDto, SupplierUpdate,
};

impl BackofficeClient {
    // ── Suppliers ───────────────────────────────────────────────────

    pub async fn list_suppliers(&self) -> Result<Vec<SupplierDto>, Error> {
        self.get("api/supplier").await
    }

    pub async fn get_supplier(&self, id: i64) -> Result<SupplierDto, Error> {
        self.get(&format!("api/supplier/{id}")).await
    }

    pub async fn create_supplier(&self, body: &SupplierCreate) -> Result<SupplierDto, Error> {
        self.post("api/supplier", body).await
    }

    pub async fn update_supplier(
        &self,
        id: i64,
        body: &SupplierUpdate,
    ) -> Result<SupplierDto, Error> {
        self.put(&format!("api/supplier/{id}"), body).await
    }

    pub async fn delete_supplier(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("api/supplier/{id}")).await
    }

    // ── Contacts ────────────────────────────────────────────────────

    pub async fn supplier_contacts(
        &self,
        supplier_id: i64,
    ) -> Result<Vec<SupplierContactDto>, Error> {
        self.get(&format!("api/supplier/contacts/{supplier_id}"))
            .await
    }

    pub async fn add_supplier_contact(
        &self,
        supplier_id: i64,
        body: &SupplierContactCreate,
    ) -> Result<SupplierContactDto, Error> {
        self.post(&format!("api/supplier/contacts/{supplier_id}"), body)
            .await
    }

    pub async fn update_supplier_contact(
        &self,
        supplier_id: i64,
        contact_id: i64,
        body: &SupplierContactCreate,
    ) -> Result<SupplierContactDto, Error> {
        self.put(
            &format!("api/supplier/contacts/{supplier_id}/{contact_id}"),
            body,
        )
        .await
    }

    pub async fn delete_supplier_contact(
        &self,
        supplier_id: i64,
        contact_id: i64,
    ) -> Result<(), Error> {
        self.delete(&format!("api/supplier/contacts/{supplier_id}/{contact_id}"))
            .await
    }
}
