// Purchase order endpoints.

use crate::client::BackofficeClient;
use crate::error::Error;
use crate::types::{
    PurchaseCreate, PurchaseDto, PurchaseStatus, PurchaseStatusUpdate, PurchaseUpdate,
};

impl BackofficeClient {
    pub async fn list_purchases(&self) -> Result<Vec<PurchaseDto>, Error> {
        self.get("api/purchase").await
    }

    pub async fn get_purchase(&self, id: i64) -> Result<PurchaseDto, Error> {
        self.get(&format!("api/purchase/{id}")).await
    }

    pub async fn create_purchase(&self, body: &PurchaseCreate) -> Result<PurchaseDto, Error> {
        self.post("api/purchase", body).await
    }

    pub async fn update_purchase(
        &self,
        id: i64,
        body: &PurchaseUpdate,
    ) -> Result<PurchaseDto, Error> {
        self.put(&format!("api/purchase/{id}"), body).await
    }

    pub async fn delete_purchase(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("api/purchase/{id}")).await
    }

    /// Server-side filter by purchase status.
    pub async fn purchases_with_status(
        &self,
        status: PurchaseStatus,
    ) -> Result<Vec<PurchaseDto>, Error> {
        self.get(&format!("api/purchase/status/{status}")).await
    }

    /// Purchase orders placed with one supplier.
    pub async fn purchases_for_supplier(
        &self,
        supplier_id: i64,
    ) -> Result<Vec<PurchaseDto>, Error> {
        self.get(&format!("api/purchase/supplier/{supplier_id}"))
            .await
    }

    /// Advance a purchase order's status. Echoes the full record.
    pub async fn set_purchase_status(
        &self,
        id: i64,
        status: PurchaseStatus,
    ) -> Result<PurchaseDto, Error> {
        self.put(
            &format!("api/purchase/{id}/status"),
            &PurchaseStatusUpdate { status },
        )
        .await
    }
}
