// ── API-to-domain type conversions ──
//
// Bridges `opsdeck_api` wire types into canonical `model` types. The
// derived fields (stock status, order totals) are computed here and
// nowhere else, so a record looks the same whether it arrived via a
// full refresh, a mutation echo, or a single-record fetch.

use opsdeck_api::types::{
    InventoryItemDto, LineItemDto, OrderDto, PurchaseDto, SupplierContactDto, SupplierDto,
};

use crate::model::{
    order_total, stock_status, InventoryItem, LineItem, PurchaseOrder, SalesOrder, Supplier,
    SupplierContact,
};

impl From<InventoryItemDto> for InventoryItem {
    fn from(dto: InventoryItemDto) -> Self {
        let status = stock_status(dto.quantity, dto.reorder_point);
        Self {
            id: dto.id,
            name: dto.name,
            sku: dto.sku,
            category: dto.category,
            description: dto.description,
            price: dto.price,
            cost_price: dto.cost_price,
            quantity: dto.quantity,
            reorder_point: dto.reorder_point,
            location: dto.location,
            supplier_id: dto.supplier_id,
            image_url: dto.image_url,
            last_updated: dto.updated_at,
            status,
        }
    }
}

impl From<SupplierDto> for Supplier {
    fn from(dto: SupplierDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            contact_name: dto.contact_name,
            email: dto.email,
            phone: dto.phone,
            address: dto.address,
            city: dto.city,
            country: dto.country,
            postal_code: dto.postal_code,
            is_active: dto.is_active,
        }
    }
}

impl From<SupplierContactDto> for SupplierContact {
    fn from(dto: SupplierContactDto) -> Self {
        Self {
            id: dto.id,
            supplier_id: dto.supplier_id,
            name: dto.name,
            position: dto.position,
            email: dto.email,
            phone: dto.phone,
            is_primary: dto.is_primary,
        }
    }
}

impl From<LineItemDto> for LineItem {
    fn from(dto: LineItemDto) -> Self {
        Self {
            item_id: dto.item_id,
            name: dto.name,
            quantity: dto.quantity,
            unit_price: dto.unit_price,
        }
    }
}

impl From<OrderDto> for SalesOrder {
    fn from(dto: OrderDto) -> Self {
        let items: Vec<LineItem> = dto.items.into_iter().map(LineItem::from).collect();
        let total = order_total(&items);
        Self {
            id: dto.id,
            order_number: dto.order_number,
            customer: dto.customer,
            date: dto.date,
            status: dto.status,
            items,
            payment_status: dto.payment_status,
            total,
        }
    }
}

impl From<PurchaseDto> for PurchaseOrder {
    fn from(dto: PurchaseDto) -> Self {
        let items: Vec<LineItem> = dto.items.into_iter().map(LineItem::from).collect();
        let total = order_total(&items);
        Self {
            id: dto.id,
            po_number: dto.po_number,
            supplier_id: dto.supplier_id,
            date: dto.date,
            expected_delivery_date: dto.expected_delivery_date,
            status: dto.status,
            items,
            payment_status: dto.payment_status,
            total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::StockStatus;
    use opsdeck_api::types::{OrderStatus, PaymentStatus};

    fn item_dto(quantity: u32, reorder_point: u32) -> InventoryItemDto {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Desk Lamp",
            "sku": "SKU-1001",
            "category": "Electronics",
            "description": "Adjustable desk lamp",
            "price": 29.99,
            "costPrice": 12.5,
            "quantity": quantity,
            "reorderPoint": reorder_point,
            "location": "Main Warehouse",
            "supplierId": 3,
            "updatedAt": "2024-06-15T10:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn inventory_conversion_derives_status() {
        assert_eq!(
            InventoryItem::from(item_dto(0, 5)).status,
            StockStatus::OutOfStock
        );
        assert_eq!(
            InventoryItem::from(item_dto(3, 5)).status,
            StockStatus::LowStock
        );
        assert_eq!(
            InventoryItem::from(item_dto(10, 5)).status,
            StockStatus::InStock
        );
    }

    #[test]
    fn order_conversion_derives_total() {
        let dto: OrderDto = serde_json::from_value(serde_json::json!({
            "id": 7,
            "orderNumber": "ORD-2001",
            "customer": "Acme Corporation",
            "date": "2024-06-15T10:30:00Z",
            "status": "Processing",
            "items": [
                { "itemId": 1, "name": "Desk Lamp", "quantity": 2, "unitPrice": 29.99 },
                { "itemId": 2, "name": "Notebook", "quantity": 10, "unitPrice": 3.5 }
            ],
            "paymentStatus": "Partial"
        }))
        .unwrap();

        let order = SalesOrder::from(dto);

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_status, PaymentStatus::Partial);
        assert!((order.total - (2.0 * 29.99 + 10.0 * 3.5)).abs() < 1e-9);
    }
}
