//! Reader directory trait.

use chrono::{DateTime, Utc};
use std::future::Future;
use tagstream_core::{ReaderConfig, ReaderId, Result, TenantId};

/// Resolves a physical reader's external identifier to its configuration.
pub trait ReaderDirectory: Send + Sync {
    /// Look up a reader by its external identifier within a tenant.
    ///
    /// Returns the configuration regardless of status; the engine decides
    /// whether a non-active reader rejects the detection.
    ///
    /// # Errors
    ///
    /// - `DetectionError::ReaderNotFound` if no reader matches.
    /// - `DetectionError::Store` on lookup failure.
    fn resolve(
        &self,
        tenant_id: TenantId,
        reader_id: &ReaderId,
    ) -> impl Future<Output = Result<ReaderConfig>> + Send;

    /// Record that this reader just reported a detection.
    ///
    /// Fire-and-forget side channel: failures are the implementation's to
    /// log, and the result does not affect the detection outcome.
    ///
    /// # Errors
    ///
    /// Returns an error on store failure; callers spawn and log, never
    /// propagate.
    fn touch_last_seen(
        &self,
        tenant_id: TenantId,
        reader_id: &ReaderId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<()>> + Send;
}
