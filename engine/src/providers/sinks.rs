//! Append-only sink traits: movement ledger, audit trail, notification
//! persistence.
//!
//! All three are best-effort from the engine's point of view: a failed
//! append is logged with enough context for operational remediation and
//! never fails the detection call.

use std::future::Future;
use tagstream_core::{AlertNotification, AuditEntry, MovementRecord, Result};

/// Append-only stock movement ledger.
pub trait MovementLedger: Send + Sync {
    /// Append one movement record.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure; entries are never mutated.
    fn record(&self, entry: &MovementRecord) -> impl Future<Output = Result<()>> + Send;
}

/// Append-only audit trail.
pub trait AuditSink: Send + Sync {
    /// Append one audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure; entries are never mutated.
    fn record(&self, entry: &AuditEntry) -> impl Future<Output = Result<()>> + Send;
}

/// Persistence for alert notifications (the inbox the out-of-scope UI
/// layer reads from).
pub trait NotificationStore: Send + Sync {
    /// Persist one notification.
    ///
    /// # Errors
    ///
    /// Returns an error on write failure.
    fn persist(&self, notification: &AlertNotification) -> impl Future<Output = Result<()>> + Send;
}
