//! Tag registry trait.

use std::future::Future;
use tagstream_core::{InventoryItem, Result, TenantId};

/// Resolves a tag identifier to the inventory item it is bound to.
///
/// Read-only; a consistent snapshot of the item at resolution time.
pub trait TagRegistry: Send + Sync {
    /// Look up the inventory item bound to a tag within a tenant.
    ///
    /// # Errors
    ///
    /// - `DetectionError::TagNotRegistered` if the tag is not bound to any
    ///   item in the tenant.
    /// - `DetectionError::Store` on lookup failure.
    fn resolve(
        &self,
        tenant_id: TenantId,
        tag_id: &str,
    ) -> impl Future<Output = Result<InventoryItem>> + Send;
}
