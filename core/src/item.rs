//! Inventory item record.

use crate::ids::{ItemId, TenantId};
use crate::location::Location;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// Purchased stock at rest.
    Purchase,
    /// Sold, awaiting physical confirmation (in transit).
    SalePending,
    /// Sold through.
    Sale,
    /// Received after a pending sale; set by detection of an in-transit
    /// item.
    Purchased,
}

/// The inventory record every detection mutates.
///
/// Invariants:
/// - `quantity` never goes negative (detections floor at zero).
/// - `low_stock_alert_sent == true` implies the last recorded quantity was
///   at or below `threshold`; the flag is the edge-trigger latch that
///   suppresses duplicate alerts.
/// - `version` increments on every successful store update and is the key
///   of the optimistic compare-and-swap write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Item identity within the tenant.
    pub item_id: ItemId,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit, unique per tenant.
    pub sku: String,
    /// Bound RFID/UHF tag, unique per tenant when present.
    pub tag_id: Option<String>,
    /// On-hand quantity.
    pub quantity: u32,
    /// Low-stock threshold.
    pub threshold: u32,
    /// Current resting place.
    pub location: Location,
    /// Lifecycle status.
    pub lifecycle_status: LifecycleStatus,
    /// Edge-trigger latch for low-stock alerts.
    pub low_stock_alert_sent: bool,
    /// Optimistic concurrency counter.
    pub version: u64,
}
