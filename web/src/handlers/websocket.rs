//! Reader-facing WebSocket endpoint.
//!
//! One connection per authenticated tenant session. Inbound `tag-read`
//! frames run the same engine path as the HTTP endpoint; the resulting
//! `item-movement` and `low-stock-alert` events arrive through the
//! tenant's broadcast channel, which this session (and every other
//! session of the tenant) is subscribed to. Failures are answered with an
//! `error` frame on the originating connection only.
//!
//! # Message Protocol
//!
//! **Client → Server:**
//! ```json
//! { "type": "tag-read", "tagId": "TAG-1", "uhfId": "UHF-1", "timestamp": "..." }
//! ```
//!
//! **Server → Client (broadcast):**
//! ```json
//! { "type": "item-movement", "itemId": "...", "quantity": 4, ... }
//! { "type": "low-stock-alert", "itemId": "...", "threshold": 5, ... }
//! ```
//!
//! **Server → Client (originating connection only):**
//! ```json
//! { "type": "error", "message": "Reader 'UHF-9' not found" }
//! ```

use crate::extractors::Actor;
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use chrono::{DateTime, Utc};
use futures::{stream::StreamExt, SinkExt};
use serde::{Deserialize, Serialize};
use tagstream_core::ReaderId;
use tagstream_engine::{
    AuditSink, InventoryStore, MovementLedger, NotificationStore, PushGateway, ReaderDirectory,
    TagRegistry, UserDirectory,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Frames a reader session may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ClientFrame {
    /// A tag passed the reader's antenna.
    #[serde(rename_all = "camelCase")]
    TagRead {
        tag_id: String,
        uhf_id: String,
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },
}

/// Frames sent to the originating session only.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum SessionFrame {
    /// A detection failed; broadcast events were not emitted.
    Error { message: String },
}

/// `GET /ws/readers`: upgrade to a tenant-scoped reader session.
#[allow(clippy::unused_async)] // Axum handler signature requires async
pub async fn handle<RD, TR, IS, ML, AU, NS, PG, UD>(
    ws: WebSocketUpgrade,
    actor: Actor,
    State(state): State<AppState<RD, TR, IS, ML, AU, NS, PG, UD>>,
) -> Response
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
    info!(tenant = %actor.tenant_id, "reader session requested");
    ws.on_upgrade(move |socket| handle_socket(socket, state, actor))
}

/// Session lifecycle: interleave inbound tag reads with outbound tenant
/// events until either side closes.
async fn handle_socket<RD, TR, IS, ML, AU, NS, PG, UD>(
    socket: WebSocket,
    state: AppState<RD, TR, IS, ML, AU, NS, PG, UD>,
    actor: Actor,
) where
    RD: ReaderDirectory + Clone + 'static,
    TR: TagRegistry + Clone + 'static,
    IS: InventoryStore + Clone + 'static,
    ML: MovementLedger + Clone + 'static,
    AU: AuditSink + Clone + 'static,
    NS: NotificationStore + Clone + 'static,
    PG: PushGateway + Clone + 'static,
    UD: UserDirectory + Clone + 'static,
{
    info!(tenant = %actor.tenant_id, "reader session established");

    let mut events = state.broadcaster.subscribe(actor.tenant_id).await;
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = handle_frame(&state, &actor, &text).await {
                        let Ok(json) = serde_json::to_string(&reply) else {
                            continue;
                        };
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!(tenant = %actor.tenant_id, "reader session closed by client");
                    break;
                }
                Some(Ok(_)) => {
                    debug!("ignoring non-text frame");
                }
                Some(Err(error)) => {
                    debug!(%error, "reader session transport error");
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(json) = serde_json::to_string(&event) else {
                        continue;
                    };
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(tenant = %actor.tenant_id, skipped, "session lagging, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(tenant = %actor.tenant_id, "tenant channel closed");
                    break;
                }
            },
        }
    }

    info!(tenant = %actor.tenant_id, "reader session terminated");
}

/// Process one inbound frame. Returns the frame to send back to this
/// session, if any; successful detections answer through the broadcast
/// channel instead.
async fn handle_frame<RD, TR, IS, ML, AU, NS, PG, UD>(
    state: &AppState<RD, TR, IS, ML, AU, NS, PG, UD>,
    actor: &Actor,
    text: &str,
) -> Option<SessionFrame>
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
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(error) => {
            debug!(%error, "unparseable reader frame");
            return Some(SessionFrame::Error {
                message: "Malformed frame".to_string(),
            });
        }
    };

    let ClientFrame::TagRead {
        tag_id,
        uhf_id,
        timestamp,
    } = frame;
    debug!(tag = %tag_id, reader = %uhf_id, ?timestamp, "tag-read frame");

    let reader_id = ReaderId(uhf_id);
    match state
        .engine
        .process_detection(actor.tenant_id, &reader_id, &tag_id, &actor.context)
        .await
    {
        Ok(_) => None,
        Err(error) => Some(SessionFrame::Error {
            message: error.to_string(),
        }),
    }
}
