//! Push-notification gateway trait.

use std::future::Future;
use tagstream_core::{AlertNotification, Result, UserId};

/// Delivery of a notification to one user's registered devices.
///
/// Per-recipient and independently fallible: one unreachable device never
/// affects delivery to the others.
pub trait PushGateway: Send + Sync {
    /// Deliver a notification to one recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery to this recipient failed; the fanout
    /// logs it and continues with the remaining recipients.
    fn deliver(
        &self,
        recipient: UserId,
        notification: &AlertNotification,
    ) -> impl Future<Output = Result<()>> + Send;
}
