//! Realtime publisher trait and event frames.
//!
//! The engine never touches sockets. It hands tenant-scoped events to a
//! [`RealtimePublisher`]; the web adapter owns the actual connections and
//! implements this trait over its broadcaster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tagstream_core::{ItemId, LifecycleStatus, LocationView, TenantId};

/// Event frames broadcast to all sessions subscribed to a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RealtimeEvent {
    /// An item changed location/quantity after a detection.
    #[serde(rename_all = "camelCase")]
    ItemMovement {
        /// Item identity.
        item_id: ItemId,
        /// Item display name.
        name: String,
        /// Stock-keeping unit.
        sku: String,
        /// Bound tag.
        tag_id: Option<String>,
        /// Lifecycle status after the detection.
        status: LifecycleStatus,
        /// Quantity after the detection.
        quantity: u32,
        /// Location after the detection.
        location: LocationView,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
    /// An item crossed into the low-stock condition.
    #[serde(rename_all = "camelCase")]
    LowStockAlert {
        /// Item identity.
        item_id: ItemId,
        /// Item display name.
        name: String,
        /// Stock-keeping unit.
        sku: String,
        /// Bound tag.
        tag_id: Option<String>,
        /// Remaining quantity.
        quantity: u32,
        /// Configured threshold.
        threshold: u32,
        /// Item location.
        location: LocationView,
        /// Event time.
        timestamp: DateTime<Utc>,
    },
}

/// Best-effort broadcast to connected realtime sessions of a tenant.
pub trait RealtimePublisher: Send + Sync {
    /// Publish an event to every session subscribed to the tenant.
    ///
    /// Returns the number of sessions the event was handed to. Zero is
    /// not an error; nobody being connected is normal.
    fn publish(
        &self,
        tenant_id: TenantId,
        event: RealtimeEvent,
    ) -> impl Future<Output = usize> + Send;
}
