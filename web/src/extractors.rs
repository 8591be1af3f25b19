//! Custom Axum extractors.
//!
//! The pipeline sits behind a gateway that authenticates callers and
//! forwards their identity as headers. [`Actor`] extracts that identity;
//! handlers never parse the headers themselves.
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(actor: Actor) -> Result<Json<Response>, AppError> {
//!     tracing::info!(tenant = %actor.tenant_id, "Processing request");
//!     Ok(Json(response))
//! }
//! ```

use crate::error::AppError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tagstream_core::{ActorContext, TenantId, UserId};
use uuid::Uuid;

/// The authenticated caller: tenant scope plus the acting user, taken
/// from the gateway-forwarded identity headers.
///
/// Required headers: `X-Tenant-Id` and `X-User-Id` (UUIDs). Optional:
/// `X-User-Name`, `X-User-Role`.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Tenant every lookup and write is scoped to.
    pub tenant_id: TenantId,
    /// Acting user, recorded in movement and audit entries.
    pub context: ActorContext,
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = required_uuid(&parts.headers, "X-Tenant-Id")?;
        let user_id = required_uuid(&parts.headers, "X-User-Id")?;

        Ok(Self {
            tenant_id: TenantId(tenant_id),
            context: ActorContext {
                user_id: UserId(user_id),
                name: optional_header(&parts.headers, "X-User-Name")
                    .unwrap_or_else(|| "system".to_string()),
                role: optional_header(&parts.headers, "X-User-Role")
                    .unwrap_or_else(|| "Reader".to_string()),
            },
        })
    }
}

fn required_uuid(headers: &HeaderMap, name: &str) -> Result<Uuid, AppError> {
    let value = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(format!("Missing {name} header")))?;
    Uuid::parse_str(value).map_err(|_| AppError::bad_request(format!("Invalid {name} header")))
}

fn optional_header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
