//! Recording mocks for the side-effect channels, with switchable failure
//! modes for testing the best-effort contract.

use crate::providers::{
    AuditSink, MovementLedger, NotificationStore, PushGateway, RealtimeEvent, RealtimePublisher,
};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tagstream_core::{
    AlertNotification, AuditEntry, DetectionError, MovementRecord, Result, TenantId, UserId,
};

macro_rules! recording_sink {
    ($(#[$meta:meta])* $name:ident, $entry:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            entries: Arc<Mutex<Vec<$entry>>>,
            fail: Arc<AtomicBool>,
        }

        impl $name {
            /// Create an empty sink.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Make subsequent writes fail.
            pub fn fail_writes(&self, fail: bool) {
                self.fail.store(fail, Ordering::SeqCst);
            }

            /// Everything recorded so far.
            ///
            /// # Panics
            ///
            /// Panics if the internal lock is poisoned.
            #[allow(clippy::unwrap_used)] // Test utility
            #[must_use]
            pub fn entries(&self) -> Vec<$entry> {
                self.entries.lock().unwrap().clone()
            }

            fn append(&self, entry: $entry) -> Result<()> {
                if self.fail.load(Ordering::SeqCst) {
                    return Err(DetectionError::Store("sink unavailable".to_string()));
                }
                self.entries
                    .lock()
                    .map_err(|_| DetectionError::Internal)?
                    .push(entry);
                Ok(())
            }
        }
    };
}

recording_sink! {
    /// Recording movement ledger.
    MockMovementLedger, MovementRecord
}

recording_sink! {
    /// Recording audit sink.
    MockAuditSink, AuditEntry
}

recording_sink! {
    /// Recording notification store.
    MockNotificationStore, AlertNotification
}

impl MovementLedger for MockMovementLedger {
    fn record(&self, entry: &MovementRecord) -> impl Future<Output = Result<()>> + Send {
        let result = self.append(entry.clone());
        async move { result }
    }
}

impl AuditSink for MockAuditSink {
    fn record(&self, entry: &AuditEntry) -> impl Future<Output = Result<()>> + Send {
        let result = self.append(entry.clone());
        async move { result }
    }
}

impl NotificationStore for MockNotificationStore {
    fn persist(&self, notification: &AlertNotification) -> impl Future<Output = Result<()>> + Send {
        let result = self.append(notification.clone());
        async move { result }
    }
}

/// Recording push gateway; deliveries are `(recipient, notification)`
/// pairs.
#[derive(Debug, Clone, Default)]
pub struct MockPushGateway {
    deliveries: Arc<Mutex<Vec<(UserId, AlertNotification)>>>,
    fail: Arc<AtomicBool>,
}

impl MockPushGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent deliveries fail.
    pub fn fail_deliveries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Deliveries recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)] // Test utility
    #[must_use]
    pub fn deliveries(&self) -> Vec<(UserId, AlertNotification)> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl PushGateway for MockPushGateway {
    fn deliver(
        &self,
        recipient: UserId,
        notification: &AlertNotification,
    ) -> impl Future<Output = Result<()>> + Send {
        let deliveries = Arc::clone(&self.deliveries);
        let fail = self.fail.load(Ordering::SeqCst);
        let notification = notification.clone();

        async move {
            if fail {
                return Err(DetectionError::Store("push gateway unreachable".to_string()));
            }
            deliveries
                .lock()
                .map_err(|_| DetectionError::Internal)?
                .push((recipient, notification));
            Ok(())
        }
    }
}

/// Recording realtime publisher.
#[derive(Debug, Clone, Default)]
pub struct MockRealtimePublisher {
    events: Arc<Mutex<Vec<(TenantId, RealtimeEvent)>>>,
}

impl MockRealtimePublisher {
    /// Create an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)] // Test utility
    #[must_use]
    pub fn events(&self) -> Vec<(TenantId, RealtimeEvent)> {
        self.events.lock().unwrap().clone()
    }
}

impl RealtimePublisher for MockRealtimePublisher {
    fn publish(
        &self,
        tenant_id: TenantId,
        event: RealtimeEvent,
    ) -> impl Future<Output = usize> + Send {
        let events = Arc::clone(&self.events);

        async move {
            if let Ok(mut guard) = events.lock() {
                guard.push((tenant_id, event));
            }
            1
        }
    }
}
