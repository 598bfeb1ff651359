//! Client-side state layer between `opsdeck-api` and view consumers.
//!
//! This crate owns the domain model, validation, and data
//! synchronization for Opsdeck front-ends:
//!
//! - **[`Stores`]** — One collection store per resource family
//!   (inventory, suppliers, sales orders, purchase orders, reports).
//!   Each holds its fetched collection plus loading/error metadata,
//!   applies mutations through the remote API, and reconciles local
//!   state with the server's authoritative echo.
//!
//! - **[`SessionManager`]** — Login/logout state machine over the shared
//!   session context, with optimistic rehydration of persisted sessions
//!   and forced logout when a token refresh fails irrecoverably.
//!
//! - **Validators** ([`validate`]) — Synchronous per-form field rules
//!   producing a field → message map; a submission with a non-empty map
//!   never reaches the network.
//!
//! - **Domain model** ([`model`]) — Canonical records with derived
//!   fields ([`stock_status`](model::stock_status),
//!   [`order_total`](model::order_total)) computed in exactly one place.

pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod validate;

mod convert;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use session::{SessionManager, SessionState};
pub use store::{
    InventoryStore, OrderStore, PurchaseStore, ReportStore, Stores, SupplierStore,
};
pub use validate::{FieldErrors, InventoryForm, OrderForm, PurchaseForm, SupplierForm, UserForm};

// Re-export the transport layer consumers wire the stores to.
pub use opsdeck_api as api;
pub use opsdeck_api::{
    BackofficeClient, MemorySessionStore, SessionHandle, SessionStore, TransportConfig,
    UserProfile,
};

pub use model::{
    Category, DailySales, InventoryItem, LineItem, OrderStatus, PaymentMethodSales,
    PaymentStatus, Permission, PurchaseOrder, PurchaseStatus, Role, SalesOrder, SalesReport,
    StockStatus, Supplier, SupplierContact, TopSellingItem, UserAccount,
};
