//! PostgreSQL reader directory.

use crate::rows::{location_from_columns, location_to_columns, reader_status_from_str};
use crate::store_err;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tagstream_core::location::LocationLabels;
use tagstream_core::{DetectionError, ReaderConfig, ReaderId, Result, TenantId};
use tagstream_engine::ReaderDirectory;

/// Reader directory backed by the `readers` table.
#[derive(Clone)]
pub struct PgReaderDirectory {
    pool: PgPool,
}

impl PgReaderDirectory {
    /// Create a directory over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReaderDirectory for PgReaderDirectory {
    async fn resolve(&self, tenant_id: TenantId, reader_id: &ReaderId) -> Result<ReaderConfig> {
        let row = sqlx::query(
            r"
            SELECT name, status, loc_granularity, warehouse_id, zone_id, shelf_id, bin_id,
                   warehouse_name, zone_name, shelf_name, bin_name, last_seen_at
            FROM readers
            WHERE tenant_id = $1 AND external_id = $2
            ",
        )
        .bind(tenant_id.0)
        .bind(&reader_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to resolve reader", e))?
        .ok_or_else(|| DetectionError::ReaderNotFound {
            reader_id: reader_id.0.clone(),
        })?;

        let granularity: String = row
            .try_get("loc_granularity")
            .map_err(|e| store_err("reader row", e))?;
        let fixed_location = location_from_columns(
            &granularity,
            row.try_get("warehouse_id")
                .map_err(|e| store_err("reader row", e))?,
            row.try_get("zone_id").map_err(|e| store_err("reader row", e))?,
            row.try_get("shelf_id").map_err(|e| store_err("reader row", e))?,
            row.try_get("bin_id").map_err(|e| store_err("reader row", e))?,
        )?;

        let status: String = row.try_get("status").map_err(|e| store_err("reader row", e))?;

        Ok(ReaderConfig {
            tenant_id,
            external_id: reader_id.clone(),
            name: row.try_get("name").map_err(|e| store_err("reader row", e))?,
            status: reader_status_from_str(&status)?,
            fixed_location,
            location_labels: LocationLabels {
                warehouse_name: row
                    .try_get("warehouse_name")
                    .map_err(|e| store_err("reader row", e))?,
                zone_name: row
                    .try_get("zone_name")
                    .map_err(|e| store_err("reader row", e))?,
                shelf_name: row
                    .try_get("shelf_name")
                    .map_err(|e| store_err("reader row", e))?,
                bin_name: row
                    .try_get("bin_name")
                    .map_err(|e| store_err("reader row", e))?,
            },
            last_seen_at: row
                .try_get("last_seen_at")
                .map_err(|e| store_err("reader row", e))?,
        })
    }

    async fn touch_last_seen(
        &self,
        tenant_id: TenantId,
        reader_id: &ReaderId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r"
            UPDATE readers SET last_seen_at = $3
            WHERE tenant_id = $1 AND external_id = $2
            ",
        )
        .bind(tenant_id.0)
        .bind(&reader_id.0)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to update reader last_seen_at", e))?;
        Ok(())
    }
}

/// Register or reconfigure a reader. Used by the out-of-scope CRUD layer
/// and by integration tests to seed fixtures.
///
/// # Errors
///
/// Returns [`DetectionError::Store`] on write failure.
pub async fn upsert_reader(pool: &PgPool, reader: &ReaderConfig) -> Result<()> {
    let cols = location_to_columns(&reader.fixed_location);
    sqlx::query(
        r"
        INSERT INTO readers (tenant_id, external_id, name, status, loc_granularity,
                             warehouse_id, zone_id, shelf_id, bin_id,
                             warehouse_name, zone_name, shelf_name, bin_name, last_seen_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ON CONFLICT (tenant_id, external_id) DO UPDATE SET
            name = EXCLUDED.name,
            status = EXCLUDED.status,
            loc_granularity = EXCLUDED.loc_granularity,
            warehouse_id = EXCLUDED.warehouse_id,
            zone_id = EXCLUDED.zone_id,
            shelf_id = EXCLUDED.shelf_id,
            bin_id = EXCLUDED.bin_id,
            warehouse_name = EXCLUDED.warehouse_name,
            zone_name = EXCLUDED.zone_name,
            shelf_name = EXCLUDED.shelf_name,
            bin_name = EXCLUDED.bin_name
        ",
    )
    .bind(reader.tenant_id.0)
    .bind(&reader.external_id.0)
    .bind(&reader.name)
    .bind(reader.status_name())
    .bind(cols.granularity)
    .bind(cols.warehouse_id)
    .bind(cols.zone_id)
    .bind(cols.shelf_id)
    .bind(cols.bin_id)
    .bind(&reader.location_labels.warehouse_name)
    .bind(&reader.location_labels.zone_name)
    .bind(&reader.location_labels.shelf_name)
    .bind(&reader.location_labels.bin_name)
    .bind(reader.last_seen_at)
    .execute(pool)
    .await
    .map_err(|e| store_err("failed to upsert reader", e))?;
    Ok(())
}
