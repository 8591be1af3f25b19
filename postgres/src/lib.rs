//! PostgreSQL provider implementations for the Tagstream pipeline.
//!
//! One struct per provider trait, all sharing a [`sqlx::PgPool`]. Queries
//! are runtime-bound (no compile-time checked macros) so the crate builds
//! without a database; the schema lives under `migrations/`.
//!
//! The inventory write is the optimistic concurrency anchor of the whole
//! pipeline: `UPDATE … WHERE version = $expected` with zero rows affected
//! reported as a version mismatch for the engine to retry.
//!
//! # Example
//!
//! ```ignore
//! use sqlx::PgPool;
//! use tagstream_postgres::{PgInventory, PgReaderDirectory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgresql://localhost/tagstream").await?;
//! let inventory = PgInventory::new(pool.clone());
//! let readers = PgReaderDirectory::new(pool);
//! # Ok(())
//! # }
//! ```

mod inventory;
mod readers;
mod rows;
mod sinks;
mod users;

pub use inventory::PgInventory;
pub use readers::{upsert_reader, PgReaderDirectory};
pub use sinks::{PgAuditSink, PgMovementLedger, PgNotificationStore};
pub use users::PgUserDirectory;

use tagstream_core::{DetectionError, Result};

/// Run the pipeline migrations against a pool.
///
/// # Errors
///
/// Returns [`DetectionError::Store`] if applying migrations fails.
pub async fn migrate(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DetectionError::Store(format!("migration failed: {e}")))?;
    Ok(())
}

pub(crate) fn store_err(context: &str, error: sqlx::Error) -> DetectionError {
    DetectionError::Store(format!("{context}: {error}"))
}
