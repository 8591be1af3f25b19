//! Inventory store trait.

use std::future::Future;
use tagstream_core::{InventoryItem, ItemId, Result, TenantId};

/// Writable view of inventory items with optimistic concurrency.
///
/// The engine only ever mutates items; creation and deletion belong to the
/// purchase/shipment flows outside this pipeline.
pub trait InventoryStore: Send + Sync {
    /// Persist an updated item if and only if the stored version still
    /// equals `expected_version`.
    ///
    /// The item carries its already-bumped version; implementations
    /// compare against `expected_version` (the version the plan was
    /// computed from) and write atomically.
    ///
    /// # Errors
    ///
    /// - `DetectionError::VersionMismatch` if a concurrent update won the
    ///   race.
    /// - `DetectionError::Store` on write failure.
    fn update(
        &self,
        item: &InventoryItem,
        expected_version: u64,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Re-read an item for a retry after a conflict.
    ///
    /// # Errors
    ///
    /// - `DetectionError::TagNotRegistered` if the item vanished (tag
    ///   unbound concurrently).
    /// - `DetectionError::Store` on read failure.
    fn reload(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
    ) -> impl Future<Output = Result<InventoryItem>> + Send;
}
