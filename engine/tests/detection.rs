//! End-to-end engine tests over the in-memory mock providers.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use std::sync::Arc;
use std::time::Duration;
use tagstream_engine::mocks::{
    MockAuditSink, MockInventory, MockMovementLedger, MockNotificationStore, MockPushGateway,
    MockReaderDirectory, MockRealtimePublisher, MockUserDirectory,
};
use tagstream_engine::{
    DetectionEngine, DetectionEnvironment, RealtimeEvent, RetryPolicy,
};
use tagstream_core::location::{Location, LocationLabels};
use tagstream_core::{
    ActorContext, DateTime, DetectionError, FixedClock, InventoryItem, ItemId, LifecycleStatus,
    ReaderConfig, ReaderId, ReaderStatus, Severity, TenantId, UserId, Utc,
};
use chrono::TimeZone;
use uuid::Uuid;

type TestEngine = DetectionEngine<
    MockReaderDirectory,
    MockInventory,
    MockInventory,
    MockMovementLedger,
    MockAuditSink,
    MockNotificationStore,
    MockPushGateway,
    MockRealtimePublisher,
    MockUserDirectory,
>;

struct Fixture {
    engine: TestEngine,
    readers: MockReaderDirectory,
    inventory: MockInventory,
    movements: MockMovementLedger,
    audit: MockAuditSink,
    notifications: MockNotificationStore,
    push: MockPushGateway,
    realtime: MockRealtimePublisher,
    users: MockUserDirectory,
    tenant: TenantId,
    actor: ActorContext,
}

/// Route engine logs through the test harness. `try_init` loses the race
/// to whichever test registered the subscriber first; that is fine.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Instant every record in these tests is stamped with.
fn detection_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

fn fixture() -> Fixture {
    init_tracing();

    let readers = MockReaderDirectory::new();
    let inventory = MockInventory::new();
    let movements = MockMovementLedger::new();
    let audit = MockAuditSink::new();
    let notifications = MockNotificationStore::new();
    let push = MockPushGateway::new();
    let realtime = MockRealtimePublisher::new();
    let users = MockUserDirectory::new();

    let env = DetectionEnvironment::new(
        readers.clone(),
        inventory.clone(),
        inventory.clone(),
        movements.clone(),
        audit.clone(),
        notifications.clone(),
        push.clone(),
        realtime.clone(),
        users.clone(),
        Arc::new(FixedClock(detection_time())),
    );

    Fixture {
        engine: DetectionEngine::new(env),
        readers,
        inventory,
        movements,
        audit,
        notifications,
        push,
        realtime,
        users,
        tenant: TenantId(Uuid::from_u128(100)),
        actor: ActorContext {
            user_id: UserId(Uuid::from_u128(200)),
            name: "Dana Operator".to_string(),
            role: "InventoryManager".to_string(),
        },
    }
}

fn bin_location() -> Location {
    Location::Bin {
        warehouse_id: Uuid::from_u128(1),
        zone_id: Uuid::from_u128(2),
        shelf_id: Uuid::from_u128(3),
        bin_id: Uuid::from_u128(4),
    }
}

fn seed_reader(fx: &Fixture, status: ReaderStatus) -> ReaderId {
    let reader_id = ReaderId::new("UHF-DOCK-03");
    fx.readers.insert(ReaderConfig {
        tenant_id: fx.tenant,
        external_id: reader_id.clone(),
        name: "Dock 3".to_string(),
        status,
        fixed_location: bin_location(),
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

fn seed_item(fx: &Fixture, quantity: u32, threshold: u32, latched: bool) -> ItemId {
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
        low_stock_alert_sent: latched,
        version: 0,
    });
    item_id
}

/// Side effects are detached tasks; poll until the condition holds.
async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within deadline");
}

#[tokio::test]
async fn last_unit_detection_raises_one_high_alert() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 1, 5, false);
    let recipient = UserId(Uuid::from_u128(300));
    fx.users.set_recipients(fx.tenant, vec![recipient]);

    let outcome = fx
        .engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap();

    assert_eq!(outcome.quantity, 0);
    assert!(outcome.low_stock_alert);
    assert_eq!(outcome.location.bin_name.as_deref(), Some("B4"));

    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert_eq!(stored.quantity, 0);
    assert_eq!(stored.location, bin_location());
    assert!(stored.low_stock_alert_sent);

    let notifications = fx.notifications.clone();
    eventually(move || notifications.entries().len() == 1).await;
    let notification = fx.notifications.entries().remove(0);
    assert_eq!(notification.severity, Severity::High);
    assert_eq!(notification.recipients, vec![recipient]);

    let push = fx.push.clone();
    eventually(move || push.deliveries().len() == 1).await;
}

#[tokio::test]
async fn repeat_detection_floors_quantity_and_stays_silent() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 1, 5, false);

    fx.engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap();
    let second = fx
        .engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap();

    assert_eq!(second.quantity, 0);
    assert!(!second.low_stock_alert, "latched item must not re-alert");

    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert_eq!(stored.quantity, 0);
    assert!(stored.low_stock_alert_sent);

    // Exactly one notification across both detections.
    let notifications = fx.notifications.clone();
    eventually(move || notifications.entries().len() == 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fx.notifications.entries().len(), 1);

    // The zero-delta second detection is still in the ledger.
    let movements = fx.movements.clone();
    eventually(move || movements.entries().len() == 2).await;
    let entries = fx.movements.entries();
    assert_eq!(entries[0].quantity_delta, 1);
    assert_eq!(entries[1].quantity_delta, 0);
}

#[tokio::test]
async fn healthy_stock_detection_produces_no_alert() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 10, 5, false);

    let outcome = fx
        .engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap();

    assert_eq!(outcome.quantity, 9);
    assert!(!outcome.low_stock_alert);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(fx.notifications.entries().is_empty());
    assert!(fx.push.deliveries().is_empty());
}

#[tokio::test]
async fn externally_latched_item_never_realerts_on_detections() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 6, 5, true);

    for expected in [5, 4, 3] {
        let outcome = fx
            .engine
            .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
            .await
            .unwrap();
        assert_eq!(outcome.quantity, expected);
        assert!(!outcome.low_stock_alert);
    }

    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert!(stored.low_stock_alert_sent);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(fx.notifications.entries().is_empty());
}

#[tokio::test]
async fn inactive_reader_rejects_without_touching_state() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Inactive);
    let item_id = seed_item(&fx, 5, 5, false);

    let err = fx
        .engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap_err();

    assert!(matches!(err, DetectionError::ReaderInactive { .. }));
    assert!(err.is_precondition());

    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert_eq!(stored.quantity, 5);
    assert_eq!(stored.version, 0);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(fx.movements.entries().is_empty());
    assert!(fx.audit.entries().is_empty());
    assert!(fx.notifications.entries().is_empty());
}

#[tokio::test]
async fn unknown_reader_and_unknown_tag_are_rejected() {
    let fx = fixture();
    seed_item(&fx, 5, 5, false);

    let err = fx
        .engine
        .process_detection(fx.tenant, &ReaderId::new("UHF-NOPE"), "TAG-1", &fx.actor)
        .await
        .unwrap_err();
    assert!(matches!(err, DetectionError::ReaderNotFound { .. }));

    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    let err = fx
        .engine
        .process_detection(fx.tenant, &reader_id, "TAG-UNKNOWN", &fx.actor)
        .await
        .unwrap_err();
    assert!(matches!(err, DetectionError::TagNotRegistered { .. }));
}

#[tokio::test]
async fn every_detection_pairs_one_movement_with_one_audit_entry() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 10, 2, false);

    for _ in 0..3 {
        fx.engine
            .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
            .await
            .unwrap();
    }

    let movements = fx.movements.clone();
    let audit = fx.audit.clone();
    eventually(move || movements.entries().len() == 3 && audit.entries().len() == 3).await;

    let last_audit = fx.audit.entries().pop().unwrap();
    let stored = fx
        .inventory
        .get(fx.tenant, ItemId(Uuid::from_u128(50)))
        .unwrap();

    // The audit "after" snapshot matches the persisted item state.
    let after = last_audit.details.get("after").unwrap();
    assert_eq!(
        after.get("quantity").unwrap().as_u64().unwrap(),
        u64::from(stored.quantity)
    );
    assert_eq!(last_audit.actor_name, "Dana Operator");
    assert_eq!(last_audit.action, "tag_detected");

    // Both records carry the injected clock's instant.
    assert_eq!(last_audit.recorded_at, detection_time());
    assert!(fx
        .movements
        .entries()
        .iter()
        .all(|movement| movement.recorded_at == detection_time()));
}

#[tokio::test]
async fn movement_broadcast_reaches_tenant_channel() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 1, 5, false);

    fx.engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap();

    let realtime = fx.realtime.clone();
    eventually(move || realtime.events().len() == 2).await;

    let events = fx.realtime.events();
    assert!(events
        .iter()
        .any(|(_, e)| matches!(e, RealtimeEvent::ItemMovement { quantity: 0, .. })));
    assert!(events
        .iter()
        .any(|(_, e)| matches!(e, RealtimeEvent::LowStockAlert { quantity: 0, .. })));
    assert!(events.iter().all(|(tenant, _)| *tenant == fx.tenant));
}

#[tokio::test]
async fn sink_failures_never_fail_the_detection() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 1, 5, false);
    fx.users
        .set_recipients(fx.tenant, vec![UserId(Uuid::from_u128(300))]);

    fx.movements.fail_writes(true);
    fx.audit.fail_writes(true);
    fx.notifications.fail_writes(true);
    fx.push.fail_deliveries(true);

    let outcome = fx
        .engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap();

    // The authoritative mutation stands even though every channel failed.
    assert_eq!(outcome.quantity, 0);
    assert!(outcome.low_stock_alert);
    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert_eq!(stored.quantity, 0);
    assert!(stored.low_stock_alert_sent);
}

#[tokio::test]
async fn reader_last_seen_is_updated_after_detection() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    seed_item(&fx, 10, 5, false);

    fx.engine
        .process_detection(fx.tenant, &reader_id, "TAG-1", &fx.actor)
        .await
        .unwrap();

    let readers = fx.readers.clone();
    let tenant = fx.tenant;
    let id = reader_id.clone();
    eventually(move || readers.last_seen(tenant, &id).is_some()).await;
}

#[tokio::test]
async fn concurrent_detections_on_one_item_never_lose_an_update() {
    let fx = fixture();
    let reader_id = seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 8, 2, false);

    let engine = fx.engine.clone().with_retry(RetryPolicy {
        max_attempts: 10,
        initial_delay: Duration::from_millis(1),
        multiplier: 2,
    });

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        let reader_id = reader_id.clone();
        let tenant = fx.tenant;
        let actor = fx.actor.clone();
        handles.push(tokio::spawn(async move {
            engine
                .process_detection(tenant, &reader_id, "TAG-1", &actor)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 8, "all racing detections should land via retry");

    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert_eq!(stored.quantity, 0);
    assert_eq!(stored.version, 8);
    assert!(stored.low_stock_alert_sent);

    // Exactly one raise across the whole racing sequence.
    let notifications = fx.notifications.clone();
    eventually(move || !notifications.entries().is_empty()).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fx.notifications.entries().len(), 1);
}

#[tokio::test]
async fn quantity_change_replenishment_clears_latch_without_notification() {
    let fx = fixture();
    seed_reader(&fx, ReaderStatus::Active);
    let item_id = seed_item(&fx, 2, 5, true);

    let outcome = fx
        .engine
        .process_quantity_change(
            fx.tenant,
            tagstream_engine::QuantityChange {
                item_id,
                new_quantity: 20,
                reason: "Replenishment PO-77".to_string(),
            },
            &fx.actor,
        )
        .await
        .unwrap();

    assert_eq!(outcome.quantity, 20);
    assert!(!outcome.low_stock_alert);

    let stored = fx.inventory.get(fx.tenant, item_id).unwrap();
    assert!(!stored.low_stock_alert_sent, "Clear must reset the latch");

    let movements = fx.movements.clone();
    eventually(move || movements.entries().len() == 1).await;
    let movement = fx.movements.entries().remove(0);
    assert_eq!(movement.quantity_delta, 18);
    assert_eq!(movement.reason, "Replenishment PO-77");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(fx.notifications.entries().is_empty(), "Clear sends nothing");
}

#[tokio::test]
async fn quantity_change_drop_below_threshold_raises_alert() {
    let fx = fixture();
    let item_id = seed_item(&fx, 10, 5, false);
    fx.users
        .set_recipients(fx.tenant, vec![UserId(Uuid::from_u128(300))]);

    let outcome = fx
        .engine
        .process_quantity_change(
            fx.tenant,
            tagstream_engine::QuantityChange {
                item_id,
                new_quantity: 3,
                reason: "Outgoing shipment SH-12".to_string(),
            },
            &fx.actor,
        )
        .await
        .unwrap();

    assert!(outcome.low_stock_alert);

    let notifications = fx.notifications.clone();
    eventually(move || notifications.entries().len() == 1).await;
    assert_eq!(fx.notifications.entries()[0].severity, Severity::Medium);
}
