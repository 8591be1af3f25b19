//! PostgreSQL append-only sinks: movement ledger, audit trail,
//! notification inbox.

use crate::rows::{direction_to_str, severity_to_str};
use crate::store_err;
use sqlx::PgPool;
use tagstream_core::{AlertNotification, AuditEntry, MovementRecord, Result};
use tagstream_engine::{AuditSink, MovementLedger, NotificationStore};

/// Movement ledger backed by the `stock_movements` table.
#[derive(Clone)]
pub struct PgMovementLedger {
    pool: PgPool,
}

impl PgMovementLedger {
    /// Create a ledger over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MovementLedger for PgMovementLedger {
    async fn record(&self, entry: &MovementRecord) -> Result<()> {
        let source = entry
            .source
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| tagstream_core::DetectionError::Store(format!("encode source: {e}")))?;
        let destination = entry
            .destination
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| {
                tagstream_core::DetectionError::Store(format!("encode destination: {e}"))
            })?;

        sqlx::query(
            r"
            INSERT INTO stock_movements
                (movement_id, tenant_id, item_id, quantity_delta, direction,
                 reason, source, destination, actor_id, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(entry.movement_id.0)
        .bind(entry.tenant_id.0)
        .bind(entry.item_id.0)
        .bind(i64::from(entry.quantity_delta))
        .bind(direction_to_str(entry.direction))
        .bind(&entry.reason)
        .bind(source)
        .bind(destination)
        .bind(entry.actor_id.0)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to append movement", e))?;
        Ok(())
    }
}

/// Audit trail backed by the `audit_log` table.
#[derive(Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    /// Create a sink over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AuditSink for PgAuditSink {
    async fn record(&self, entry: &AuditEntry) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO audit_log
                (tenant_id, actor_id, actor_name, actor_role, action,
                 module, description, details, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(entry.tenant_id.0)
        .bind(entry.actor_id.0)
        .bind(&entry.actor_name)
        .bind(&entry.actor_role)
        .bind(&entry.action)
        .bind(&entry.module)
        .bind(&entry.description)
        .bind(&entry.details)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to append audit entry", e))?;
        Ok(())
    }
}

/// Notification inbox backed by the `notifications` table.
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationStore for PgNotificationStore {
    async fn persist(&self, notification: &AlertNotification) -> Result<()> {
        let recipients: Vec<uuid::Uuid> =
            notification.recipients.iter().map(|id| id.0).collect();

        sqlx::query(
            r"
            INSERT INTO notifications
                (notification_id, tenant_id, title, message, severity,
                 item_id, recipients, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(notification.notification_id.0)
        .bind(notification.tenant_id.0)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(severity_to_str(notification.severity))
        .bind(notification.item_id.0)
        .bind(&recipients)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to persist notification", e))?;
        Ok(())
    }
}
