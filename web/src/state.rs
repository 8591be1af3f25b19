//! Shared application state.

use crate::broadcast::TenantBroadcaster;
use tagstream_engine::{
    AuditSink, DetectionEngine, InventoryStore, MovementLedger, NotificationStore, PushGateway,
    ReaderDirectory, TagRegistry, UserDirectory,
};

/// State handed to every handler: the engine plus the broadcaster the
/// WebSocket sessions subscribe to.
///
/// The broadcaster appears twice by construction: once inside the engine
/// (as its realtime publisher) and once here (for session subscription).
/// Both are clones over the same channel map.
#[derive(Clone)]
pub struct AppState<RD, TR, IS, ML, AU, NS, PG, UD>
where
    RD: ReaderDirectory + Clone,
    TR: TagRegistry + Clone,
    IS: InventoryStore + Clone,
    ML: MovementLedger + Clone,
    AU: AuditSink + Clone,
    NS: NotificationStore + Clone,
    PG: PushGateway + Clone,
    UD: UserDirectory + Clone,
{
    /// The detection engine, shared by both transports.
    pub engine: DetectionEngine<RD, TR, IS, ML, AU, NS, PG, TenantBroadcaster, UD>,
    /// Realtime fanout channels, one per tenant.
    pub broadcaster: TenantBroadcaster,
}

impl<RD, TR, IS, ML, AU, NS, PG, UD> AppState<RD, TR, IS, ML, AU, NS, PG, UD>
where
    RD: ReaderDirectory + Clone,
    TR: TagRegistry + Clone,
    IS: InventoryStore + Clone,
    ML: MovementLedger + Clone,
    AU: AuditSink + Clone,
    NS: NotificationStore + Clone,
    PG: PushGateway + Clone,
    UD: UserDirectory + Clone,
{
    /// Bundle an engine with the broadcaster it publishes through.
    #[must_use]
    pub const fn new(
        engine: DetectionEngine<RD, TR, IS, ML, AU, NS, PG, TenantBroadcaster, UD>,
        broadcaster: TenantBroadcaster,
    ) -> Self {
        Self {
            engine,
            broadcaster,
        }
    }
}
