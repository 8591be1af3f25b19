//! User directory trait.

use std::future::Future;
use tagstream_core::{Result, TenantId, UserId};

/// Read-only view of the tenant's user roster.
pub trait UserDirectory: Send + Sync {
    /// Users who receive low-stock alerts: the tenant's admins and
    /// inventory managers, resolved at notification creation time.
    ///
    /// # Errors
    ///
    /// Returns an error on lookup failure.
    fn alert_recipients(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<UserId>>> + Send;
}
