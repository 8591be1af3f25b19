//! PostgreSQL user directory.

use crate::store_err;
use sqlx::{PgPool, Row};
use tagstream_core::{Result, TenantId, UserId};
use tagstream_engine::UserDirectory;

/// User roster backed by the `tenant_users` table.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a directory over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PgUserDirectory {
    async fn alert_recipients(&self, tenant_id: TenantId) -> Result<Vec<UserId>> {
        let rows = sqlx::query(
            r"
            SELECT user_id FROM tenant_users
            WHERE tenant_id = $1 AND role IN ('Admin', 'InventoryManager')
            ",
        )
        .bind(tenant_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_err("failed to list alert recipients", e))?;

        rows.iter()
            .map(|row| {
                row.try_get("user_id")
                    .map(UserId)
                    .map_err(|e| store_err("user row", e))
            })
            .collect()
    }
}
