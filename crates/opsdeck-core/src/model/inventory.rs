use chrono::{DateTime, Utc};
use serde::Serialize;

// ── Stock status ────────────────────────────────────────────────────

/// Derived stock classification. Never stored independently of the
/// quantity/reorder-point pair it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    #[strum(serialize = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    #[strum(serialize = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    #[strum(serialize = "Out of Stock")]
    OutOfStock,
}

/// Classify an on-hand quantity against its reorder point.
///
/// This is the sole computation site for the derived status; every path
/// that materializes an [`InventoryItem`] (refresh, create, update, get)
/// goes through it.
pub fn stock_status(quantity: u32, reorder_point: u32) -> StockStatus {
    if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= reorder_point {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

// ── Inventory item ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub cost_price: f64,
    pub quantity: u32,
    pub reorder_point: u32,
    pub location: String,
    pub supplier_id: i64,
    pub image_url: Option<String>,
    pub last_updated: DateTime<Utc>,
    /// Derived via [`stock_status`] from the server-confirmed quantity
    /// and reorder point.
    pub status: StockStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_matches_definition() {
        assert_eq!(stock_status(0, 0), StockStatus::OutOfStock);
        assert_eq!(stock_status(0, 5), StockStatus::OutOfStock);
        assert_eq!(stock_status(1, 5), StockStatus::LowStock);
        assert_eq!(stock_status(5, 5), StockStatus::LowStock);
        assert_eq!(stock_status(6, 5), StockStatus::InStock);
        assert_eq!(stock_status(3, 0), StockStatus::InStock);
    }

    #[test]
    fn exactly_one_status_holds_over_the_grid() {
        for quantity in 0..=1000u32 {
            for reorder_point in (0..=1000u32).step_by(7) {
                let status = stock_status(quantity, reorder_point);
                let expected = if quantity == 0 {
                    StockStatus::OutOfStock
                } else if quantity <= reorder_point {
                    StockStatus::LowStock
                } else {
                    StockStatus::InStock
                };
                assert_eq!(status, expected, "q={quantity} r={reorder_point}");
                // Deterministic: recomputation agrees.
                assert_eq!(status, stock_status(quantity, reorder_point));
            }
        }
    }

    #[test]
    fn display_labels() {
        assert_eq!(StockStatus::InStock.to_string(), "In Stock");
        assert_eq!(StockStatus::LowStock.to_string(), "Low Stock");
        assert_eq!(StockStatus::OutOfStock.to_string(), "Out of Stock");
    }
}
