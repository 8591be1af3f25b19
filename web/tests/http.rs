//! HTTP adapter tests over the in-memory mock providers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tagstream_core::location::{Location, LocationLabels};
use tagstream_core::{
    InventoryItem, ItemId, LifecycleStatus, ReaderConfig, ReaderId, ReaderStatus, SystemClock,
    TenantId, UserId,
};
use tagstream_engine::mocks::{
    MockAuditSink, MockInventory, MockMovementLedger, MockNotificationStore, MockPushGateway,
    MockReaderDirectory, MockUserDirectory,
};
use tagstream_engine::{DetectionEngine, DetectionEnvironment, RealtimeEvent};
use tagstream_web::{router, AppState, TenantBroadcaster};
use uuid::Uuid;

struct Fixture {
    server: TestServer,
    readers: MockReaderDirectory,
    inventory: MockInventory,
    broadcaster: TenantBroadcaster,
    tenant: TenantId,
    user: UserId,
}

/// Route handler logs through the test harness. `try_init` loses the race
/// to whichever test registered the subscriber first; that is fine.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixture() -> Fixture {
    init_tracing();

    let readers = MockReaderDirectory::new();
    let inventory = MockInventory::new();
    let broadcaster = TenantBroadcaster::new();

    let env = DetectionEnvironment::new(
        readers.clone(),
        inventory.clone(),
        inventory.clone(),
        MockMovementLedger::new(),
        MockAuditSink::new(),
        MockNotificationStore::new(),
        MockPushGateway::new(),
        broadcaster.clone(),
        MockUserDirectory::new(),
        Arc::new(SystemClock),
    );
    let state = AppState::new(DetectionEngine::new(env), broadcaster.clone());

    Fixture {
        server: TestServer::new(router(state)).expect("Server should start"),
        readers,
        inventory,
        broadcaster,
        tenant: TenantId(Uuid::from_u128(100)),
        user: UserId(Uuid::from_u128(200)),
    }
}

fn header(name: &'static str, value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(name),
        HeaderValue::from_str(value).expect("Valid header value"),
    )
}

fn identity_headers(fx: &Fixture) -> Vec<(HeaderName, HeaderValue)> {
    vec![
        header("x-tenant-id", &fx.tenant.0.to_string()),
        header("x-user-id", &fx.user.0.to_string()),
        header("x-user-name", "Dana Operator"),
        header("x-user-role", "InventoryManager"),
    ]
}

fn seed_reader(fx: &Fixture, status: ReaderStatus) -> ReaderId {
    let reader_id = ReaderId::new("UHF-DOCK-03");
    fx.readers.insert(ReaderConfig {
        tenant_id: fx.tenant,
        external_id: reader_id.clone(),
        name: "Dock 3".to_string(),
        status,
        fixed_location: Location::Bin {
            warehouse_id: Uuid::from_u128(1),
            zone_id: Uuid::from_u128(2),
            shelf_id: Uuid::from_u128(3),
            bin_id: Uuid::from_u128(4),
        },
        location_labels: LocationLabels {
            warehouse_name: Some("Main".to_string()),
            zone_name: Some("North".to_string()),
            shelf_name: Some("S3".to_string()),
            bin_name: Some("B4".to_string()),
        },
        last_seen_at: None,
    });
    reader_id
}

fn seed_item(fx: &Fixture, quantity: u32, threshold: u32) -> ItemId {
    let item_id = ItemId(Uuid::from_u128(50));
    fx.inventory.insert(InventoryItem {
        tenant_id: fx.tenant,
        item_id,
        name: "Widget".to_string(),
        sku: "WID-1".to_string(),
        tag_id: Some("TAG-1".to_string()),
        quantity,
        threshold,
        location: Location::Warehouse {
            warehouse_id: Uuid::from_u128(1),
        },
        lifecycle_status: LifecycleStatus::Purchase,
        low_stock_alert_sent: false,
        version: 0,
    });
    item_id
}

async fn post_detect(fx: &Fixture, body: Value) -> axum_test::TestResponse {
    let mut request = fx.server.post("/tags/detect");
    for (name, value) in identity_headers(fx) {
        request = request.add_header(name, value);
    }
    request.json(&body).await
}

#[tokio::test]
async fn detection_returns_the_committed_item_state() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 10, 5);

    let response = post_detect(&fx, json!({"tagId": "TAG-1", "uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["tagId"], "TAG-1");
    assert_eq!(body["uhfId"], "UHF-DOCK-03");
    assert_eq!(body["itemId"], item_id.to_string());
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["sku"], "WID-1");
    assert_eq!(body["status"], "purchase");
    assert_eq!(body["quantity"], 9);
    assert_eq!(body["threshold"], 5);
    assert_eq!(body["lowStockAlert"], false);
    assert!(body["movementId"].is_string());

    // Location flattened to the reader's bin granularity, names included.
    assert_eq!(body["location"]["warehouseName"], "Main");
    assert_eq!(body["location"]["zoneName"], "North");
    assert_eq!(body["location"]["shelfName"], "S3");
    assert_eq!(body["location"]["binName"], "B4");
    assert_eq!(
        body["location"]["binId"],
        Uuid::from_u128(4).to_string()
    );

    // The item actually moved.
    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert_eq!(stored.quantity, 9);
    assert_eq!(stored.location, Location::Bin {
        warehouse_id: Uuid::from_u128(1),
        zone_id: Uuid::from_u128(2),
        shelf_id: Uuid::from_u128(3),
        bin_id: Uuid::from_u128(4),
    });
}

#[tokio::test]
async fn in_transit_item_is_marked_purchased_on_arrival() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 10, 5);
    let mut pending = fx.inventory.get(fx.tenant, item_id).unwrap();
    pending.lifecycle_status = LifecycleStatus::SalePending;
    fx.inventory.insert(pending);

    let response = post_detect(&fx, json!({"tagId": "TAG-1", "uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "purchased");

    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert_eq!(stored.lifecycle_status, LifecycleStatus::Purchased);
}

#[tokio::test]
async fn last_unit_detection_reports_the_alert() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 1, 5);

    let response = post_detect(&fx, json!({"tagId": "TAG-1", "uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["quantity"], 0);
    assert_eq!(body["lowStockAlert"], true);
}

#[tokio::test]
async fn missing_fields_are_rejected_with_400() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 10, 5);

    let response = post_detect(&fx, json!({"uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = post_detect(&fx, json!({"tagId": "", "uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = post_detect(&fx, json!({"tagId": "TAG-1"})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_reader_is_404_and_item_is_untouched() {
    let fx = fixture();
    let item_id = seed_item(&fx, 10, 5);

    let response = post_detect(&fx, json!({"tagId": "TAG-1", "uhfId": "UHF-GHOST"})).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(fx.inventory.get(fx.tenant, item_id).unwrap().quantity, 10);
}

#[tokio::test]
async fn inactive_reader_is_404() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Maintenance);
    seed_item(&fx, 10, 5);

    let response = post_detect(&fx, json!({"tagId": "TAG-1", "uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["message"], "Reader 'UHF-DOCK-03' is maintenance");
}

#[tokio::test]
async fn unknown_tag_is_404() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);

    let response = post_detect(&fx, json!({"tagId": "TAG-404", "uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_identity_headers_are_401() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 10, 5);

    let response = fx
        .server
        .post("/tags/detect")
        .json(&json!({"tagId": "TAG-1", "uhfId": "UHF-DOCK-03"}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn detection_broadcasts_to_the_tenant_channel() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 10, 5);

    let mut events = fx.broadcaster.subscribe(fx.tenant).await;
    let response = post_detect(&fx, json!({"tagId": "TAG-1", "uhfId": "UHF-DOCK-03"})).await;
    response.assert_status(StatusCode::OK);

    // The broadcast runs on a detached task after the response.
    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("Broadcast should arrive")
        .expect("Channel should stay open");

    match event {
        RealtimeEvent::ItemMovement { sku, quantity, .. } => {
            assert_eq!(sku, "WID-1");
            assert_eq!(quantity, 9);
        }
        RealtimeEvent::LowStockAlert { .. } => panic!("unexpected alert event"),
    }
}
