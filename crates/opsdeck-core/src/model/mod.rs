// Canonical domain types held by the collection stores.
//
// Users, roles, and the sales report have no derived fields and are
// consumed in their wire shape; they are re-exported here so views only
// ever import from the model.

mod inventory;
mod order;
mod purchase;
mod supplier;

pub use inventory::{stock_status, InventoryItem, StockStatus};
pub use order::{order_total, LineItem, SalesOrder};
pub use purchase::PurchaseOrder;
pub use supplier::{Supplier, SupplierContact};

pub use opsdeck_api::session::UserProfile;
pub use opsdeck_api::types::{
    CategoryDto as Category, DailySalesDto as DailySales, OrderStatus,
    PaymentMethodSalesDto as PaymentMethodSales, PaymentStatus, PermissionDto as Permission,
    PurchaseStatus, RoleDto as Role, SalesReportDto as SalesReport,
    TopSellingItemDto as TopSellingItem, UserDto as UserAccount,
};
