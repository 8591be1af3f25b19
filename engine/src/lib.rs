//! # Tagstream Engine
//!
//! The imperative shell of the detection pipeline: resolves readers and
//! tags through provider traits, runs the pure plan from `tagstream-core`,
//! applies it with an optimistic compare-and-swap write, and fans out the
//! best-effort side effects (movement ledger, audit trail, low-stock
//! notifications).
//!
//! ## Two-phase contract
//!
//! Every call commits the authoritative item mutation first, then
//! dispatches side effects as detached tasks. A failing ledger write or an
//! unreachable push gateway is logged and absorbed; it never rolls back the
//! item state or fails the call. The caller always learns the authoritative
//! outcome of the inventory mutation and nothing else.
//!
//! ## Concurrency
//!
//! The engine is stateless between calls and safe to invoke concurrently.
//! Races on a single item (redundant readers, concurrent manual updates)
//! are closed by the version counter on [`tagstream_core::InventoryItem`]:
//! the write is a compare-and-swap, and on conflict the read-plan-write
//! sequence re-runs from a fresh read, bounded by [`retry::RetryPolicy`].

pub mod engine;
pub mod environment;
pub mod fanout;
pub mod providers;
pub mod retry;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use engine::{DetectionEngine, DetectionOutcome, QuantityChange};
pub use environment::DetectionEnvironment;
pub use fanout::{FanoutResult, NotificationFanout};
pub use providers::{
    AuditSink, InventoryStore, MovementLedger, NotificationStore, PushGateway, ReaderDirectory,
    RealtimeEvent, RealtimePublisher, TagRegistry, UserDirectory,
};
pub use retry::RetryPolicy;
