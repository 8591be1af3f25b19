//! Axum transport adapters for the Tagstream pipeline.
//!
//! Two inbound transports over one engine:
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐
//! │ POST         │     │ WebSocket         │
//! │ /tags/detect │     │ /ws/readers       │
//! └──────┬───────┘     └────────┬──────────┘
//!        │    DetectionEngine   │
//!        └──────────┬───────────┘
//!                   │
//!        TenantBroadcaster ──► connected sessions
//! ```
//!
//! A detection arriving over HTTP and one arriving over the reader socket
//! run exactly the same engine path; the transports differ only in
//! framing. Realtime events flow back out through [`TenantBroadcaster`],
//! which the engine drives as its `RealtimePublisher`; the engine never
//! touches a socket.
//!
//! # Example
//!
//! ```ignore
//! use tagstream_web::{router, AppState, TenantBroadcaster};
//!
//! let broadcaster = TenantBroadcaster::new();
//! let engine = DetectionEngine::new(environment_with(broadcaster.clone()));
//! let app = router(AppState::new(engine, broadcaster));
//! axum::serve(listener, app).await?;
//! ```

pub mod broadcast;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use broadcast::TenantBroadcaster;
pub use error::AppError;
pub use extractors::Actor;
pub use router::router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
