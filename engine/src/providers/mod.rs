//! Provider traits.
//!
//! Everything the engine needs from the outside world, as narrow traits.
//! Production implementations live in `tagstream-postgres` (persistence)
//! and `tagstream-web` (realtime transport); in-memory mocks live in
//! [`crate::mocks`].
//!
//! All traits use `async fn` in trait; the engine and environment are
//! generic over the concrete providers rather than boxing trait objects.

mod inventory;
mod notify;
mod readers;
mod realtime;
mod sinks;
mod tags;
mod users;

pub use inventory::InventoryStore;
pub use notify::PushGateway;
pub use readers::ReaderDirectory;
pub use realtime::{RealtimeEvent, RealtimePublisher};
pub use sinks::{AuditSink, MovementLedger, NotificationStore};
pub use tags::TagRegistry;
pub use users::UserDirectory;
