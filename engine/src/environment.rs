//! Detection environment.
//!
//! All external dependencies of the engine, injected as one bundle. The
//! engine is generic over the concrete providers; production wiring pairs
//! the Postgres stores with the web broadcaster, tests pair the in-memory
//! mocks.

use crate::providers::{
    AuditSink, InventoryStore, MovementLedger, NotificationStore, PushGateway, ReaderDirectory,
    RealtimePublisher, TagRegistry, UserDirectory,
};
use std::sync::Arc;
use tagstream_core::Clock;

/// Dependency bundle for the detection engine.
///
/// # Type Parameters
///
/// - `RD`: Reader directory
/// - `TR`: Tag registry
/// - `IS`: Inventory store (CAS writes)
/// - `ML`: Movement ledger
/// - `AU`: Audit sink
/// - `NS`: Notification store
/// - `PG`: Push gateway
/// - `RT`: Realtime publisher
/// - `UD`: User directory
#[derive(Clone)]
pub struct DetectionEnvironment<RD, TR, IS, ML, AU, NS, PG, RT, UD>
where
    RD: ReaderDirectory + Clone,
    TR: TagRegistry + Clone,
    IS: InventoryStore + Clone,
    ML: MovementLedger + Clone,
    AU: AuditSink + Clone,
    NS: NotificationStore + Clone,
    PG: PushGateway + Clone,
    RT: RealtimePublisher + Clone,
    UD: UserDirectory + Clone,
{
    /// Reader directory.
    pub readers: RD,

    /// Tag registry.
    pub tags: TR,

    /// Inventory store.
    pub inventory: IS,

    /// Movement ledger.
    pub movements: ML,

    /// Audit sink.
    pub audit: AU,

    /// Notification store.
    pub notifications: NS,

    /// Push-notification gateway.
    pub push: PG,

    /// Realtime publisher.
    pub realtime: RT,

    /// User directory.
    pub users: UD,

    /// Clock.
    pub clock: Arc<dyn Clock>,
}

impl<RD, TR, IS, ML, AU, NS, PG, RT, UD> DetectionEnvironment<RD, TR, IS, ML, AU, NS, PG, RT, UD>
where
    RD: ReaderDirectory + Clone,
    TR: TagRegistry + Clone,
    IS: InventoryStore + Clone,
    ML: MovementLedger + Clone,
    AU: AuditSink + Clone,
    NS: NotificationStore + Clone,
    PG: PushGateway + Clone,
    RT: RealtimePublisher + Clone,
    UD: UserDirectory + Clone,
{
    /// Create a new detection environment.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        readers: RD,
        tags: TR,
        inventory: IS,
        movements: ML,
        audit: AU,
        notifications: NS,
        push: PG,
        realtime: RT,
        users: UD,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            readers,
            tags,
            inventory,
            movements,
            audit,
            notifications,
            push,
            realtime,
            users,
            clock,
        }
    }
}
