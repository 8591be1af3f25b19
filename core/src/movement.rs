//! Movement ledger entries.

use crate::ids::{ItemId, MovementId, TenantId, UserId};
use crate::location::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Stock entering (replenishment).
    In,
    /// Stock leaving its prior resting place.
    Out,
}

/// Append-only ledger entry, created once per successful detection or
/// quantity change and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRecord {
    /// Ledger entry identity.
    pub movement_id: MovementId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Item that moved.
    pub item_id: ItemId,
    /// Units moved. A detection of an already-empty item records a delta
    /// of zero so the observation is still traceable.
    pub quantity_delta: u32,
    /// Movement direction.
    pub direction: Direction,
    /// Human-readable reason, e.g. the reporting reader's name.
    pub reason: String,
    /// Where the unit came from.
    pub source: Option<Location>,
    /// Where the unit ended up.
    pub destination: Option<Location>,
    /// Acting user.
    pub actor_id: UserId,
    /// When the movement was recorded.
    pub recorded_at: DateTime<Utc>,
}
