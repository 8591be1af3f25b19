//! In-memory mock providers for testing.
//!
//! Gated behind the default-on `test-utils` feature so engine and adapter
//! tests (and downstream crates' tests) can wire a full environment
//! without a database or a socket server.

mod directory;
mod inventory;
mod sinks;

pub use directory::{MockReaderDirectory, MockUserDirectory};
pub use inventory::MockInventory;
pub use sinks::{MockAuditSink, MockMovementLedger, MockNotificationStore, MockPushGateway,
    MockRealtimePublisher};
