//! Tenant-scoped realtime broadcaster.
//!
//! One broadcast channel per tenant. WebSocket sessions subscribe to
//! their tenant's channel; the engine publishes through the
//! [`RealtimePublisher`] implementation and never sees a socket.
//!
//! Delivery is fire-and-forget: a lagging or absent subscriber never
//! blocks a publish, and zero receivers is a normal condition.

use std::collections::HashMap;
use std::sync::Arc;
use tagstream_core::TenantId;
use tagstream_engine::{RealtimeEvent, RealtimePublisher};
use tokio::sync::{broadcast, RwLock};

/// Per-channel buffer before slow subscribers start lagging.
const CHANNEL_CAPACITY: usize = 1000;

/// Type alias for the channels map to reduce complexity.
type ChannelsMap = Arc<RwLock<HashMap<TenantId, broadcast::Sender<RealtimeEvent>>>>;

/// Tenant broadcaster for realtime WebSocket communication.
///
/// # Example
///
/// ```ignore
/// let broadcaster = TenantBroadcaster::new();
///
/// // Session side
/// let mut rx = broadcaster.subscribe(tenant_id).await;
///
/// // Engine side (via RealtimePublisher)
/// broadcaster.publish(tenant_id, event).await;
/// ```
#[derive(Default)]
pub struct TenantBroadcaster {
    /// Map of tenant → broadcast channel
    channels: ChannelsMap,
}

impl TenantBroadcaster {
    /// Create a new tenant broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe to a tenant's event stream.
    ///
    /// Returns a receiver that will get all events published to this
    /// tenant from the moment of subscription.
    pub async fn subscribe(&self, tenant_id: TenantId) -> broadcast::Receiver<RealtimeEvent> {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(tenant_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Count of tenants with an allocated channel.
    pub async fn tenant_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Clone for TenantBroadcaster {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl RealtimePublisher for TenantBroadcaster {
    async fn publish(&self, tenant_id: TenantId, event: RealtimeEvent) -> usize {
        let channels = self.channels.read().await;
        // No channel or no receivers both mean nobody is listening,
        // which is not an error.
        channels
            .get(&tenant_id)
            .and_then(|sender| sender.send(event).ok())
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;
    use chrono::Utc;
    use tagstream_core::{ItemId, LifecycleStatus, LocationView};

    fn movement_event(name: &str) -> RealtimeEvent {
        RealtimeEvent::ItemMovement {
            item_id: ItemId::new(),
            name: name.to_string(),
            sku: "SKU-1".to_string(),
            tag_id: Some("TAG-1".to_string()),
            status: LifecycleStatus::Purchased,
            quantity: 4,
            location: LocationView::default(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let broadcaster = TenantBroadcaster::new();
        let tenant = TenantId::new();

        let mut rx = broadcaster.subscribe(tenant).await;
        let delivered = broadcaster.publish(tenant, movement_event("Widget")).await;
        assert_eq!(delivered, 1);

        let event = rx.recv().await.expect("Should receive event");
        assert!(matches!(event, RealtimeEvent::ItemMovement { name, .. } if name == "Widget"));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let broadcaster = TenantBroadcaster::new();
        let delivered = broadcaster
            .publish(TenantId::new(), movement_event("Widget"))
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let broadcaster = TenantBroadcaster::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();

        let mut rx_a = broadcaster.subscribe(tenant_a).await;
        let mut rx_b = broadcaster.subscribe(tenant_b).await;

        broadcaster.publish(tenant_a, movement_event("OnlyA")).await;

        let event = rx_a.recv().await.expect("rx_a should receive");
        assert!(matches!(event, RealtimeEvent::ItemMovement { name, .. } if name == "OnlyA"));
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_same_tenant() {
        let broadcaster = TenantBroadcaster::new();
        let tenant = TenantId::new();

        let mut rx1 = broadcaster.subscribe(tenant).await;
        let mut rx2 = broadcaster.subscribe(tenant).await;

        let delivered = broadcaster.publish(tenant, movement_event("Both")).await;
        assert_eq!(delivered, 2);

        rx1.recv().await.expect("rx1 should receive");
        rx2.recv().await.expect("rx2 should receive");
        assert_eq!(broadcaster.tenant_count().await, 1);
    }
}
