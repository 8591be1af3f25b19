//! Notification fanout.
//!
//! One notification fans out to three channels: the notification store
//! (inbox persistence), the push gateway (per recipient), and the realtime
//! broadcast for connected sessions. Partial delivery is success of the
//! dispatch; every individual failure is logged with tenant and item
//! context so an operator can remediate.

use crate::providers::{NotificationStore, PushGateway, RealtimeEvent, RealtimePublisher};
use tagstream_core::{AlertNotification, UserId};
use tracing::{debug, warn};

/// Delivery tally for one dispatched notification. Observability only;
/// never part of the correctness contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutResult {
    /// Whether the notification reached the store.
    pub persisted: bool,
    /// Recipients the push gateway accepted delivery for.
    pub push_delivered: usize,
    /// Realtime sessions the alert frame was handed to.
    pub realtime_delivered: usize,
}

/// Fans a notification out to persistence, push, and realtime channels.
#[derive(Debug, Clone)]
pub struct NotificationFanout<NS, PG, RT> {
    store: NS,
    push: PG,
    realtime: RT,
}

impl<NS, PG, RT> NotificationFanout<NS, PG, RT>
where
    NS: NotificationStore,
    PG: PushGateway,
    RT: RealtimePublisher,
{
    /// Create a fanout over the three channels.
    pub const fn new(store: NS, push: PG, realtime: RT) -> Self {
        Self {
            store,
            push,
            realtime,
        }
    }

    /// Dispatch one notification: persist, push per recipient, broadcast.
    ///
    /// Never fails. The tally reports what got through.
    pub async fn dispatch(
        &self,
        notification: &AlertNotification,
        recipients: &[UserId],
        realtime_event: RealtimeEvent,
    ) -> FanoutResult {
        let mut result = FanoutResult::default();

        match self.store.persist(notification).await {
            Ok(()) => result.persisted = true,
            Err(error) => warn!(
                tenant_id = %notification.tenant_id,
                item_id = %notification.item_id,
                %error,
                "failed to persist low-stock notification"
            ),
        }

        for &recipient in recipients {
            match self.push.deliver(recipient, notification).await {
                Ok(()) => result.push_delivered += 1,
                Err(error) => warn!(
                    tenant_id = %notification.tenant_id,
                    item_id = %notification.item_id,
                    recipient = %recipient,
                    %error,
                    "push delivery failed for recipient"
                ),
            }
        }

        result.realtime_delivered = self
            .realtime
            .publish(notification.tenant_id, realtime_event)
            .await;

        metrics::counter!("tagstream_alerts_dispatched_total").increment(1);
        debug!(
            tenant_id = %notification.tenant_id,
            item_id = %notification.item_id,
            persisted = result.persisted,
            push_delivered = result.push_delivered,
            realtime_delivered = result.realtime_delivered,
            "low-stock notification dispatched"
        );

        result
    }
}
