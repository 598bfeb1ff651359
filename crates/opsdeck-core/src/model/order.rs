use chrono::{DateTime, Utc};
use serde::Serialize;

use opsdeck_api::types::{OrderStatus, PaymentStatus};

/// A line on a sales or purchase order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub item_id: i64,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Sum of quantity × unit price across the lines.
///
/// Sole computation site for order and purchase totals; the echoed
/// `totalAmount` wire field is ignored in favor of this.
pub fn order_total(items: &[LineItem]) -> f64 {
    items
        .iter()
        .map(|line| f64::from(line.quantity) * line.unit_price)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesOrder {
    pub id: i64,
    pub order_number: String,
    pub customer: String,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<LineItem>,
    pub payment_status: PaymentStatus,
    /// Derived via [`order_total`].
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: u32, unit_price: f64) -> LineItem {
        LineItem {
            item_id: 1,
            name: "Product".into(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn total_sums_quantity_times_price() {
        let items = vec![line(2, 10.0), line(3, 1.5)];
        assert!((order_total(&items) - 24.5).abs() < 1e-9);
    }

    #[test]
    fn empty_order_totals_zero() {
        assert!((order_total(&[]) - 0.0).abs() < f64::EPSILON);
    }
}
