#![allow(clippy::unwrap_used)]
// Store-level integration tests using wiremock: snapshot preservation on
// failure, authoritative-echo reconciliation, derived-status recompute,
// and validation blocking dispatch.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdeck_core::validate::InventoryForm;
use opsdeck_core::{
    BackofficeClient, CoreError, SessionHandle, StockStatus, Stores,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Stores) {
    let server = MockServer::start().await;
    let client = Arc::new(
        BackofficeClient::from_reqwest(
            &server.uri(),
            reqwest::Client::new(),
            SessionHandle::in_memory(),
        )
        .unwrap(),
    );
    (server, Stores::new(client))
}

fn supplier_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "contactName": "John Smith",
        "email": "john@acmesupplies.com",
        "phone": "(555) 123-4567",
        "address": "123 Supply St",
        "city": "Supplier City",
        "country": "US",
        "postalCode": "12345",
        "isActive": true
    })
}

fn item_json(id: i64, quantity: u32, reorder_point: u32) -> serde_json::Value {
    json!({
        "id": id,
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
        "imageUrl": null,
        "updatedAt": "2024-06-15T10:30:00Z"
    })
}

fn valid_form() -> InventoryForm {
    InventoryForm {
        name: "Desk Lamp".into(),
        sku: "SKU-1001".into(),
        category: "Electronics".into(),
        description: "Adjustable desk lamp".into(),
        price: "29.99".into(),
        cost_price: "12.50".into(),
        quantity: "0".into(),
        reorder_point: "5".into(),
        location: "Main Warehouse".into(),
        supplier_id: 3,
        image_url: None,
    }
}

// ── Refresh semantics ───────────────────────────────────────────────

#[tokio::test]
async fn refresh_replaces_collection_wholesale() {
    let (server, stores) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/supplier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            supplier_json(1, "Acme Supplies"),
            supplier_json(2, "Global Distribution Inc."),
        ])))
        .mount(&server)
        .await;

    stores.suppliers.refresh().await.unwrap();

    let snapshot = stores.suppliers.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].name, "Acme Supplies");
    assert!(!stores.suppliers.is_loading());
    assert!(stores.suppliers.last_error().is_none());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let (server, stores) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/supplier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            supplier_json(1, "Acme Supplies"),
            supplier_json(2, "Global Distribution Inc."),
        ])))
        .mount(&server)
        .await;

    stores.suppliers.refresh().await.unwrap();
    server.reset().await;

    Mock::given(method("GET"))
        .and(path("/api/supplier"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = stores.suppliers.refresh().await;

    assert!(matches!(result, Err(CoreError::Server { .. })));
    // Stale-but-valid data stays visible alongside the error indicator.
    assert_eq!(stores.suppliers.snapshot().len(), 2);
    assert!(stores.suppliers.last_error().is_some());
    assert!(!stores.suppliers.is_loading());
}

#[tokio::test]
async fn network_failure_on_first_load_leaves_empty_snapshot() {
    // Learn a free port, then shut the server down so the connection is
    // refused outright.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = Arc::new(
        BackofficeClient::from_reqwest(&uri, reqwest::Client::new(), SessionHandle::in_memory())
            .unwrap(),
    );
    let stores = Stores::new(client);

    let result = stores.suppliers.refresh().await;

    assert!(matches!(result, Err(CoreError::Network { .. })));
    assert!(stores.suppliers.snapshot().is_empty());
    assert!(matches!(
        stores.suppliers.last_error(),
        Some(CoreError::Network { .. })
    ));
    assert!(!stores.suppliers.is_loading());
}

#[tokio::test]
async fn refresh_all_tolerates_partial_failure() {
    let (server, stores) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/supplier"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([supplier_json(1, "Acme Supplies")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([item_json(1, 12, 5)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/order"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/purchase"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    stores.refresh_all().await;

    assert_eq!(stores.suppliers.snapshot().len(), 1);
    assert_eq!(stores.inventory.snapshot().len(), 1);
    assert!(stores.orders.snapshot().is_empty());
    assert!(stores.orders.last_error().is_some());
    assert!(stores.purchases.last_error().is_none());
}

// ── Mutation semantics ──────────────────────────────────────────────

#[tokio::test]
async fn create_appends_server_assigned_record() {
    let (server, stores) = setup().await;

    // The server assigns id 42; the client must not synthesize one.
    Mock::given(method("POST"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(item_json(42, 0, 5)))
        .mount(&server)
        .await;

    let created = stores.inventory.create(&valid_form()).await.unwrap();

    assert_eq!(created.id, 42);
    assert_eq!(created.status, StockStatus::OutOfStock);
    assert_eq!(stores.inventory.snapshot().len(), 1);
    assert!(stores.inventory.get(42).is_some());
    assert!(!stores.inventory.is_loading());
}

#[tokio::test]
async fn created_item_round_trips_through_fetch() {
    let (server, stores) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(item_json(42, 0, 5)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/items/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json(42, 0, 5)))
        .mount(&server)
        .await;

    let created = stores.inventory.create(&valid_form()).await.unwrap();
    let fetched = stores.inventory.fetch(42).await.unwrap();

    // User-supplied fields match exactly, and the derived status matches
    // the status computed from the returned quantities.
    assert_eq!(fetched.name, "Desk Lamp");
    assert_eq!(fetched.sku, "SKU-1001");
    assert_eq!(fetched.category, "Electronics");
    assert_eq!(fetched.quantity, 0);
    assert_eq!(fetched.reorder_point, 5);
    assert_eq!(
        fetched.status,
        opsdeck_core::model::stock_status(fetched.quantity, fetched.reorder_point)
    );
    assert_eq!(*fetched, *created);
    // Reconciliation replaced the record rather than duplicating it.
    assert_eq!(stores.inventory.snapshot().len(), 1);
}

#[tokio::test]
async fn validation_failure_never_reaches_the_network() {
    let (server, stores) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(item_json(1, 0, 5)))
        .expect(0)
        .mount(&server)
        .await;

    let form = InventoryForm {
        name: String::new(),
        sku: "ABC-1".into(),
        category: "Electronics".into(),
        ..valid_form()
    };

    let result = stores.inventory.create(&form).await;

    match result {
        Err(CoreError::Validation { fields }) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields.get("name"), Some("Name is required"));
        }
        other => panic!("expected Validation error, got: {other:?}"),
    }
    assert!(stores.inventory.snapshot().is_empty());
}

#[tokio::test]
async fn failed_create_leaves_collection_unchanged() {
    let (server, stores) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([item_json(1, 12, 5)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "An item with this SKU already exists"
        })))
        .mount(&server)
        .await;

    stores.inventory.refresh().await.unwrap();
    let result = stores.inventory.create(&valid_form()).await;

    assert!(matches!(result, Err(CoreError::Conflict { .. })));
    assert_eq!(stores.inventory.snapshot().len(), 1);
    assert!(matches!(
        stores.inventory.last_error(),
        Some(CoreError::Conflict { .. })
    ));
    assert!(!stores.inventory.is_loading());
}

#[tokio::test]
async fn status_recomputes_from_every_server_echo() {
    let (server, stores) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(item_json(7, 0, 5)))
        .mount(&server)
        .await;

    let created = stores.inventory.create(&valid_form()).await.unwrap();
    assert_eq!(created.status, StockStatus::OutOfStock);

    Mock::given(method("PUT"))
        .and(path("/api/inventory/items/7/quantity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json(7, 3, 5)))
        .mount(&server)
        .await;

    let updated = stores.inventory.set_quantity(7, 3).await.unwrap();
    assert_eq!(updated.status, StockStatus::LowStock);

    server.reset().await;
    Mock::given(method("PUT"))
        .and(path("/api/inventory/items/7/quantity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json(7, 10, 5)))
        .mount(&server)
        .await;

    let restocked = stores.inventory.set_quantity(7, 10).await.unwrap();
    assert_eq!(restocked.status, StockStatus::InStock);

    // The stored record was replaced in place, not duplicated.
    assert_eq!(stores.inventory.snapshot().len(), 1);
    assert_eq!(stores.inventory.get(7).unwrap().quantity, 10);
}

#[tokio::test]
async fn delete_removes_only_on_success() {
    let (server, stores) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/inventory/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([item_json(5, 12, 5)])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/inventory/items/5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    stores.inventory.refresh().await.unwrap();
    stores.inventory.delete(5).await.unwrap();
    assert!(stores.inventory.snapshot().is_empty());

    server.reset().await;
    Mock::given(method("DELETE"))
        .and(path("/api/inventory/items/5"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Item not found" })),
        )
        .mount(&server)
        .await;

    // Second delete surfaces NotFound and does not alter the collection.
    let second = stores.inventory.delete(5).await;
    assert!(matches!(second, Err(CoreError::NotFound { .. })));
    assert!(stores.inventory.snapshot().is_empty());
    assert!(!stores.inventory.is_loading());
}

#[tokio::test]
async fn order_echo_drives_derived_total() {
    let (server, stores) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/order"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 11,
            "orderNumber": "ORD-2001",
            "customer": "Acme Corporation",
            "date": "2024-06-15T10:30:00Z",
            "status": "Pending",
            "items": [
                { "itemId": 1, "name": "Desk Lamp", "quantity": 2, "unitPrice": 29.99 }
            ],
            "paymentStatus": "Unpaid"
        })))
        .mount(&server)
        .await;

    let form = opsdeck_core::OrderForm {
        customer: "Acme Corporation".into(),
        items: vec![opsdeck_core::api::types::LineItemCreate {
            item_id: 1,
            quantity: 2,
            unit_price: 29.99,
        }],
        payment_status: opsdeck_core::PaymentStatus::Unpaid,
    };

    let order = stores.orders.create(&form).await.unwrap();

    assert_eq!(order.order_number, "ORD-2001");
    assert!((order.total - 59.98).abs() < 1e-9);
}

// ── Report store ────────────────────────────────────────────────────

#[tokio::test]
async fn report_rejects_inverted_date_range_before_dispatch() {
    let (server, stores) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/sales"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let start = chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let result = stores.reports.fetch_report(start, end).await;

    match result {
        Err(CoreError::Validation { fields }) => {
            assert!(fields.get("startDate").is_some());
        }
        other => panic!("expected Validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn failed_report_fetch_keeps_previous_report() {
    let (server, stores) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/sales"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSales": 4,
            "totalRevenue": 512.5,
            "averageOrderValue": 128.125,
            "topSellingItems": [],
            "salesByPaymentMethod": [],
            "salesByDay": []
        })))
        .mount(&server)
        .await;

    let start = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let end = chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    stores.reports.fetch_report(start, end).await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/sales"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = stores.reports.fetch_report(start, end).await;

    assert!(matches!(result, Err(CoreError::Server { .. })));
    assert_eq!(stores.reports.latest().unwrap().total_sales, 4);
    assert!(stores.reports.last_error().is_some());
    assert!(!stores.reports.is_loading());
}
