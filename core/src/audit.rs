//! Audit trail entries and actor context.

use crate::ids::{TenantId, UserId};
use crate::item::LifecycleStatus;
use crate::location::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user on whose behalf an operation runs.
///
/// Produced by the transport layer from the upstream auth gateway;
/// recorded on every movement and audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorContext {
    /// Acting user.
    pub user_id: UserId,
    /// Display name at the time of the action.
    pub name: String,
    /// Role at the time of the action.
    pub role: String,
}

/// Before/after snapshot of the fields a detection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    /// Lifecycle status.
    pub status: LifecycleStatus,
    /// Resting location.
    pub location: Location,
    /// On-hand quantity.
    pub quantity: u32,
}

/// Append-only audit entry; one per successful detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Acting user.
    pub actor_id: UserId,
    /// Actor display name at action time.
    pub actor_name: String,
    /// Actor role at action time.
    pub actor_role: String,
    /// Action verb, e.g. `"tag_detected"`.
    pub action: String,
    /// Originating module, e.g. `"inventory"`.
    pub module: String,
    /// Human-readable description.
    pub description: String,
    /// Structured before/after details.
    pub details: serde_json::Value,
    /// When the action happened.
    pub recorded_at: DateTime<Utc>,
}
