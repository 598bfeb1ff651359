use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use opsdeck_api::types::{PaymentStatus, PurchaseStatus};

use super::order::LineItem;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrder {
    pub id: i64,
    pub po_number: String,
    pub supplier_id: i64,
    pub date: DateTime<Utc>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: PurchaseStatus,
    pub items: Vec<LineItem>,
    pub payment_status: PaymentStatus,
    /// Derived via [`order_total`](super::order_total) over the lines.
    pub total: f64,
}
