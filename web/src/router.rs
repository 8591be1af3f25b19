//! Route wiring.

use crate::handlers::{detect, websocket};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tagstream_engine::{
    AuditSink, InventoryStore, MovementLedger, NotificationStore, PushGateway, ReaderDirectory,
    TagRegistry, UserDirectory,
};
use tower_http::trace::TraceLayer;

/// Build the transport router over a prepared [`AppState`].
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(engine, broadcaster);
/// let app = router(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn router<RD, TR, IS, ML, AU, NS, PG, UD>(
    state: AppState<RD, TR, IS, ML, AU, NS, PG, UD>,
) -> Router
where
    RD: ReaderDirectory + Clone + 'static,
    TR: TagRegistry + Clone + 'static,
    IS: InventoryStore + Clone + 'static,
    ML: MovementLedger + Clone + 'static,
    AU: AuditSink + Clone + 'static,
    NS: NotificationStore + Clone + 'static,
    PG: PushGateway + Clone + 'static,
    UD: UserDirectory + Clone + 'static,
{
    Router::new()
        .route("/tags/detect", post(detect::handle))
        .route("/ws/readers", get(websocket::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
