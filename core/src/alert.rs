//! Low-stock alert types.

use crate::ids::{ItemId, NotificationId, TenantId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of an alert notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Low,
    /// Stock at or below threshold.
    Medium,
    /// Stock exhausted.
    High,
}

/// Alert-state transition computed for one quantity change.
///
/// `Raise` and `Clear` fire only on the edges of the low-stock condition;
/// an item that stays below threshold keeps returning `None` until it is
/// replenished above threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    /// No latch change; no notification.
    None,
    /// Latch flips on; dispatch a notification with this severity.
    Raise(Severity),
    /// Latch flips off; no notification.
    Clear,
}

impl AlertTransition {
    /// Whether this transition dispatches a notification.
    #[must_use]
    pub const fn is_raise(&self) -> bool {
        matches!(self, Self::Raise(_))
    }

    /// The latch value after applying this transition, given the value
    /// before it.
    #[must_use]
    pub const fn latch_after(&self, latch_before: bool) -> bool {
        match self {
            Self::Raise(_) => true,
            Self::Clear => false,
            Self::None => latch_before,
        }
    }
}

/// A low-stock notification, created only on a `false → true` latch
/// transition and immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNotification {
    /// Notification identity.
    pub notification_id: NotificationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Short title.
    pub title: String,
    /// Message body.
    pub message: String,
    /// Severity: `High` when the item ran out, else `Medium`.
    pub severity: Severity,
    /// Item the alert is about.
    pub item_id: ItemId,
    /// Recipients resolved at creation time from the tenant's
    /// admin/manager roster.
    pub recipients: Vec<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
