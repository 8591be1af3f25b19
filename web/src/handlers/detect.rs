//! HTTP detection endpoint.

use crate::error::AppError;
use crate::extractors::Actor;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tagstream_core::{ItemId, LifecycleStatus, LocationView, MovementId, ReaderId};
use tagstream_engine::{
    AuditSink, DetectionOutcome, InventoryStore, MovementLedger, NotificationStore, PushGateway,
    ReaderDirectory, TagRegistry, UserDirectory,
};
use tracing::info;

/// Upper bound on one detection call, conflict retries included.
const DETECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of `POST /tags/detect`.
///
/// Fields are optional at the serde level so that a missing field maps to
/// a `400` instead of the framework's generic deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    /// The detected tag identifier.
    pub tag_id: Option<String>,
    /// External identifier of the reporting reader.
    pub uhf_id: Option<String>,
}

/// Body of a successful `POST /tags/detect`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    /// The detected tag.
    pub tag_id: String,
    /// The reporting reader.
    pub uhf_id: String,
    /// Item identity.
    pub item_id: ItemId,
    /// Item display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Lifecycle status after the detection.
    pub status: LifecycleStatus,
    /// Quantity after the detection.
    pub quantity: u32,
    /// Configured low-stock threshold.
    pub threshold: u32,
    /// Location after the detection, with display names.
    pub location: LocationView,
    /// Whether this detection raised a low-stock alert.
    pub low_stock_alert: bool,
    /// Ledger entry recorded for this detection.
    pub movement_id: MovementId,
}

impl DetectResponse {
    fn from_outcome(uhf_id: String, outcome: DetectionOutcome) -> Self {
        Self {
            tag_id: outcome.tag_id,
            uhf_id,
            item_id: outcome.item_id,
            name: outcome.name,
            sku: outcome.sku,
            status: outcome.status,
            quantity: outcome.quantity,
            threshold: outcome.threshold,
            location: outcome.location,
            low_stock_alert: outcome.low_stock_alert,
            movement_id: outcome.movement_id,
        }
    }
}

/// `POST /tags/detect`.
///
/// # Errors
///
/// `400` on missing or empty body fields, `404` on reader or tag
/// precondition rejections, `409` when the item write keeps conflicting,
/// `408` if the call exceeds [`DETECT_TIMEOUT`].
pub async fn handle<RD, TR, IS, ML, AU, NS, PG, UD>(
    State(state): State<AppState<RD, TR, IS, ML, AU, NS, PG, UD>>,
    actor: Actor,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, AppError>
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
    let tag_id = non_empty(request.tag_id, "tagId")?;
    let uhf_id = non_empty(request.uhf_id, "uhfId")?;

    info!(tenant = %actor.tenant_id, reader = %uhf_id, tag = %tag_id, "detection received");

    let reader_id = ReaderId(uhf_id.clone());
    let outcome = tokio::time::timeout(
        DETECT_TIMEOUT,
        state
            .engine
            .process_detection(actor.tenant_id, &reader_id, &tag_id, &actor.context),
    )
    .await
    .map_err(|_| AppError::timeout("Detection timed out"))??;

    Ok(Json(DetectResponse::from_outcome(uhf_id, outcome)))
}

fn non_empty(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}
