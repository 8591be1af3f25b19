//! Mock reader and user directories.

use crate::providers::{ReaderDirectory, UserDirectory};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tagstream_core::{DetectionError, ReaderConfig, ReaderId, Result, TenantId, UserId};

/// Mock reader directory backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MockReaderDirectory {
    readers: Arc<Mutex<HashMap<(TenantId, ReaderId), ReaderConfig>>>,
    last_seen: Arc<Mutex<HashMap<(TenantId, ReaderId), DateTime<Utc>>>>,
}

impl MockReaderDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reader.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)] // Test utility
    pub fn insert(&self, reader: ReaderConfig) {
        self.readers
            .lock()
            .unwrap()
            .insert((reader.tenant_id, reader.external_id.clone()), reader);
    }

    /// The last-seen timestamp recorded for a reader, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)] // Test utility
    #[must_use]
    pub fn last_seen(&self, tenant_id: TenantId, reader_id: &ReaderId) -> Option<DateTime<Utc>> {
        self.last_seen
            .lock()
            .unwrap()
            .get(&(tenant_id, reader_id.clone()))
            .copied()
    }
}

impl ReaderDirectory for MockReaderDirectory {
    fn resolve(
        &self,
        tenant_id: TenantId,
        reader_id: &ReaderId,
    ) -> impl Future<Output = Result<ReaderConfig>> + Send {
        let readers = Arc::clone(&self.readers);
        let reader_id = reader_id.clone();

        async move {
            readers
                .lock()
                .map_err(|_| DetectionError::Internal)?
                .get(&(tenant_id, reader_id.clone()))
                .cloned()
                .ok_or(DetectionError::ReaderNotFound {
                    reader_id: reader_id.0,
                })
        }
    }

    fn touch_last_seen(
        &self,
        tenant_id: TenantId,
        reader_id: &ReaderId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send {
        let last_seen = Arc::clone(&self.last_seen);
        let reader_id = reader_id.clone();

        async move {
            last_seen
                .lock()
                .map_err(|_| DetectionError::Internal)?
                .insert((tenant_id, reader_id), at);
            Ok(())
        }
    }
}

/// Mock user directory with a fixed recipient roster per tenant.
#[derive(Debug, Clone, Default)]
pub struct MockUserDirectory {
    recipients: Arc<Mutex<HashMap<TenantId, Vec<UserId>>>>,
}

impl MockUserDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alert recipients for a tenant.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)] // Test utility
    pub fn set_recipients(&self, tenant_id: TenantId, users: Vec<UserId>) {
        self.recipients.lock().unwrap().insert(tenant_id, users);
    }
}

impl UserDirectory for MockUserDirectory {
    fn alert_recipients(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<UserId>>> + Send {
        let recipients = Arc::clone(&self.recipients);

        async move {
            Ok(recipients
                .lock()
                .map_err(|_| DetectionError::Internal)?
                .get(&tenant_id)
                .cloned()
                .unwrap_or_default())
        }
    }
}
