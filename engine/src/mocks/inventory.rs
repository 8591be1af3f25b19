//! Mock inventory store and tag registry over one shared map.

use crate::providers::{InventoryStore, TagRegistry};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tagstream_core::{DetectionError, InventoryItem, ItemId, Result, TenantId};

/// In-memory inventory backing both [`TagRegistry`] and
/// [`InventoryStore`], with the same compare-and-swap semantics as the
/// Postgres store: an update only lands if the stored version equals the
/// expected one, atomically under one lock.
#[derive(Debug, Clone, Default)]
pub struct MockInventory {
    items: Arc<Mutex<HashMap<(TenantId, ItemId), InventoryItem>>>,
}

impl MockInventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an item.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)] // Test utility
    pub fn insert(&self, item: InventoryItem) {
        self.items
            .lock()
            .unwrap()
            .insert((item.tenant_id, item.item_id), item);
    }

    /// Current state of an item.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)] // Test utility
    #[must_use]
    pub fn get(&self, tenant_id: TenantId, item_id: ItemId) -> Option<InventoryItem> {
        self.items.lock().unwrap().get(&(tenant_id, item_id)).cloned()
    }
}

impl TagRegistry for MockInventory {
    fn resolve(
        &self,
        tenant_id: TenantId,
        tag_id: &str,
    ) -> impl Future<Output = Result<InventoryItem>> + Send {
        let items = Arc::clone(&self.items);
        let tag_id = tag_id.to_string();

        async move {
            items
                .lock()
                .map_err(|_| DetectionError::Internal)?
                .values()
                .find(|item| {
                    item.tenant_id == tenant_id && item.tag_id.as_deref() == Some(tag_id.as_str())
                })
                .cloned()
                .ok_or(DetectionError::TagNotRegistered { tag_id })
        }
    }
}

impl InventoryStore for MockInventory {
    fn update(
        &self,
        item: &InventoryItem,
        expected_version: u64,
    ) -> impl Future<Output = Result<()>> + Send {
        let items = Arc::clone(&self.items);
        let item = item.clone();

        async move {
            let mut guard = items.lock().map_err(|_| DetectionError::Internal)?;
            let stored = guard
                .get_mut(&(item.tenant_id, item.item_id))
                .ok_or_else(|| DetectionError::TagNotRegistered {
                    tag_id: item.tag_id.clone().unwrap_or_default(),
                })?;

            if stored.version != expected_version {
                return Err(DetectionError::VersionMismatch);
            }

            *stored = item;
            Ok(())
        }
    }

    fn reload(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
    ) -> impl Future<Output = Result<InventoryItem>> + Send {
        let items = Arc::clone(&self.items);

        async move {
            items
                .lock()
                .map_err(|_| DetectionError::Internal)?
                .get(&(tenant_id, item_id))
                .cloned()
                .ok_or(DetectionError::TagNotRegistered {
                    tag_id: String::new(),
                })
        }
    }
}
