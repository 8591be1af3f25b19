//! Pure planning of a single detection.
//!
//! [`plan`] is the read-compute half of the detection flow: given one
//! consistent read of the item and the reporting reader's configuration,
//! it produces the updated item, the alert transition, and the material
//! for the movement and audit records. The engine applies the plan with a
//! compare-and-swap write and re-plans from a fresh read on conflict, so
//! everything here must stay free of I/O.

use crate::alert::{AlertNotification, AlertTransition, Severity};
use crate::audit::{ActorContext, AuditEntry, ItemSnapshot};
use crate::ids::{MovementId, NotificationId, UserId};
use crate::item::{InventoryItem, LifecycleStatus};
use crate::location;
use crate::movement::{Direction, MovementRecord};
use crate::reader::ReaderConfig;
use crate::threshold;
use chrono::{DateTime, Utc};
use serde_json::json;

/// The computed outcome of one detection, before persistence.
#[derive(Debug, Clone)]
pub struct DetectionPlan {
    /// Item state to persist, version already bumped.
    pub updated: InventoryItem,
    /// Snapshot before the detection, for the audit trail.
    pub before: ItemSnapshot,
    /// Snapshot after the detection; matches `updated`.
    pub after: ItemSnapshot,
    /// Alert-state transition to apply.
    pub transition: AlertTransition,
    /// Units recorded in the movement ledger: 1, or 0 when the quantity
    /// was already exhausted (the observation is still recorded).
    pub movement_delta: u32,
}

/// Compute the state transition for one detection.
///
/// Applies, in order: the `SalePending → Purchased` lifecycle transition
/// (detection of an in-transit item marks it received), the location
/// projection onto the reader's mount point, the single-unit decrement
/// floored at zero, and the edge-triggered threshold evaluation.
#[must_use]
pub fn plan(item: &InventoryItem, reader: &ReaderConfig) -> DetectionPlan {
    let before = ItemSnapshot {
        status: item.lifecycle_status,
        location: item.location.clone(),
        quantity: item.quantity,
    };

    let lifecycle_status = match item.lifecycle_status {
        LifecycleStatus::SalePending => LifecycleStatus::Purchased,
        other => other,
    };

    let new_location = location::project(&reader.fixed_location);
    // Each detection represents exactly one unit leaving its prior resting
    // place. Multi-unit tags are not a thing in this system today; if they
    // become one, this is the line to change.
    let new_quantity = item.quantity.saturating_sub(1);
    let movement_delta = item.quantity - new_quantity;

    let transition = threshold::evaluate(
        item.quantity,
        new_quantity,
        item.threshold,
        item.low_stock_alert_sent,
    );

    let updated = InventoryItem {
        quantity: new_quantity,
        location: new_location.clone(),
        lifecycle_status,
        low_stock_alert_sent: transition.latch_after(item.low_stock_alert_sent),
        version: item.version + 1,
        ..item.clone()
    };

    let after = ItemSnapshot {
        status: lifecycle_status,
        location: new_location,
        quantity: new_quantity,
    };

    DetectionPlan {
        updated,
        before,
        after,
        transition,
        movement_delta,
    }
}

impl DetectionPlan {
    /// Build the ledger entry for this detection.
    #[must_use]
    pub fn movement_record(
        &self,
        reader: &ReaderConfig,
        actor: &ActorContext,
        at: DateTime<Utc>,
    ) -> MovementRecord {
        MovementRecord {
            movement_id: MovementId::new(),
            tenant_id: self.updated.tenant_id,
            item_id: self.updated.item_id,
            quantity_delta: self.movement_delta,
            direction: Direction::Out,
            reason: format!("Tag detected by reader '{}'", reader.name),
            source: Some(reader.fixed_location.clone()),
            destination: Some(self.after.location.clone()),
            actor_id: actor.user_id,
            recorded_at: at,
        }
    }

    /// Build the audit entry for this detection, capturing the
    /// before/after snapshots as structured details.
    #[must_use]
    pub fn audit_entry(
        &self,
        reader: &ReaderConfig,
        actor: &ActorContext,
        at: DateTime<Utc>,
    ) -> AuditEntry {
        AuditEntry {
            tenant_id: self.updated.tenant_id,
            actor_id: actor.user_id,
            actor_name: actor.name.clone(),
            actor_role: actor.role.clone(),
            action: "tag_detected".to_string(),
            module: "inventory".to_string(),
            description: format!(
                "Tag detection of '{}' ({}) by reader '{}'",
                self.updated.name, self.updated.sku, reader.name
            ),
            details: json!({
                "readerId": reader.external_id,
                "before": self.before,
                "after": self.after,
            }),
            recorded_at: at,
        }
    }

    /// Build the low-stock notification for a `Raise` transition.
    ///
    /// Returns `None` unless this plan's transition raises the latch.
    /// Recipients are resolved by the caller at creation time.
    #[must_use]
    pub fn notification(
        &self,
        recipients: Vec<UserId>,
        at: DateTime<Utc>,
    ) -> Option<AlertNotification> {
        let AlertTransition::Raise(severity) = self.transition else {
            return None;
        };

        let message = if matches!(severity, Severity::High) {
            format!(
                "'{}' ({}) is out of stock",
                self.updated.name, self.updated.sku
            )
        } else {
            format!(
                "'{}' ({}) is low on stock: {} left (threshold {})",
                self.updated.name, self.updated.sku, self.updated.quantity, self.updated.threshold
            )
        };

        Some(AlertNotification {
            notification_id: NotificationId::new(),
            tenant_id: self.updated.tenant_id,
            title: "Low stock alert".to_string(),
            message,
            severity,
            item_id: self.updated.item_id,
            recipients,
            created_at: at,
        })
    }
}
