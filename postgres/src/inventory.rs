//! PostgreSQL inventory store and tag registry.

use crate::rows::{
    lifecycle_from_str, lifecycle_to_str, location_from_columns, location_to_columns,
    quantity_from_db, version_from_db, version_to_db,
};
use crate::store_err;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tagstream_core::{DetectionError, InventoryItem, ItemId, Result, TenantId};
use tagstream_engine::{InventoryStore, TagRegistry};

/// Inventory access backed by the `inventory_items` table, implementing
/// both the read-only tag registry and the CAS-writing store.
#[derive(Clone)]
pub struct PgInventory {
    pool: PgPool,
}

impl PgInventory {
    /// Create an inventory over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn item_from_row(tenant_id: TenantId, row: &PgRow) -> Result<InventoryItem> {
        let err = |e| store_err("inventory row", e);

        let granularity: String = row.try_get("loc_granularity").map_err(err)?;
        let location = location_from_columns(
            &granularity,
            row.try_get("warehouse_id").map_err(err)?,
            row.try_get("zone_id").map_err(err)?,
            row.try_get("shelf_id").map_err(err)?,
            row.try_get("bin_id").map_err(err)?,
        )?;

        let status: String = row.try_get("lifecycle_status").map_err(err)?;
        let quantity: i64 = row.try_get("quantity").map_err(err)?;
        let threshold: i64 = row.try_get("threshold").map_err(err)?;
        let version: i64 = row.try_get("version").map_err(err)?;

        Ok(InventoryItem {
            tenant_id,
            item_id: ItemId(row.try_get("item_id").map_err(err)?),
            name: row.try_get("name").map_err(err)?,
            sku: row.try_get("sku").map_err(err)?,
            tag_id: row.try_get("tag_id").map_err(err)?,
            quantity: quantity_from_db(quantity, "quantity")?,
            threshold: quantity_from_db(threshold, "threshold")?,
            location,
            lifecycle_status: lifecycle_from_str(&status)?,
            low_stock_alert_sent: row.try_get("low_stock_alert_sent").map_err(err)?,
            version: version_from_db(version)?,
        })
    }
}

const ITEM_COLUMNS: &str = "item_id, name, sku, tag_id, quantity, threshold, loc_granularity, \
     warehouse_id, zone_id, shelf_id, bin_id, lifecycle_status, low_stock_alert_sent, version";

impl TagRegistry for PgInventory {
    async fn resolve(&self, tenant_id: TenantId, tag_id: &str) -> Result<InventoryItem> {
        let row = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE tenant_id = $1 AND tag_id = $2"
        ))
        .bind(tenant_id.0)
        .bind(tag_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to resolve tag", e))?
        .ok_or_else(|| DetectionError::TagNotRegistered {
            tag_id: tag_id.to_string(),
        })?;

        Self::item_from_row(tenant_id, &row)
    }
}

impl InventoryStore for PgInventory {
    async fn update(&self, item: &InventoryItem, expected_version: u64) -> Result<()> {
        let cols = location_to_columns(&item.location);

        let result = sqlx::query(
            r"
            UPDATE inventory_items SET
                quantity = $3,
                loc_granularity = $4,
                warehouse_id = $5,
                zone_id = $6,
                shelf_id = $7,
                bin_id = $8,
                lifecycle_status = $9,
                low_stock_alert_sent = $10,
                version = $11
            WHERE tenant_id = $1 AND item_id = $2 AND version = $12
            ",
        )
        .bind(item.tenant_id.0)
        .bind(item.item_id.0)
        .bind(i64::from(item.quantity))
        .bind(cols.granularity)
        .bind(cols.warehouse_id)
        .bind(cols.zone_id)
        .bind(cols.shelf_id)
        .bind(cols.bin_id)
        .bind(lifecycle_to_str(item.lifecycle_status))
        .bind(item.low_stock_alert_sent)
        .bind(version_to_db(item.version)?)
        .bind(version_to_db(expected_version)?)
        .execute(&self.pool)
        .await
        .map_err(|e| store_err("failed to update item", e))?;

        // Zero rows affected means a concurrent writer bumped the version
        // between our read and this write.
        if result.rows_affected() == 0 {
            return Err(DetectionError::VersionMismatch);
        }
        Ok(())
    }

    async fn reload(&self, tenant_id: TenantId, item_id: ItemId) -> Result<InventoryItem> {
        let row = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE tenant_id = $1 AND item_id = $2"
        ))
        .bind(tenant_id.0)
        .bind(item_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_err("failed to reload item", e))?
        .ok_or(DetectionError::TagNotRegistered {
            tag_id: String::new(),
        })?;

        Self::item_from_row(tenant_id, &row)
    }
}
