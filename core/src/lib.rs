//! # Tagstream Core
//!
//! Domain model and pure logic for the tag-detection pipeline of a
//! multi-tenant warehouse inventory platform.
//!
//! This crate is the functional core: it defines the records the pipeline
//! reads and writes and the pure computations applied to them. It performs
//! no I/O. The imperative shell (the `tagstream-engine` crate) resolves
//! readers and items through provider traits, runs the pure plan from
//! [`detection`], persists the result, and dispatches side effects.
//!
//! ## Core concepts
//!
//! - [`location::Location`]: where an item rests, as a sum type over the
//!   four warehouse granularities. The wrong-fields-for-this-granularity
//!   bug class is unrepresentable.
//! - [`item::InventoryItem`]: the record every detection mutates, carrying
//!   a version counter for optimistic concurrency.
//! - [`threshold::evaluate`]: the edge-triggered low-stock transition. An
//!   item that stays below threshold raises exactly one alert until it is
//!   cleared by replenishment.
//! - [`detection::plan`]: the pure read-compute step of one detection,
//!   producing the updated item plus the before/after snapshots the audit
//!   trail records.

pub use chrono::{DateTime, Utc};

pub mod alert;
pub mod audit;
pub mod clock;
pub mod detection;
pub mod error;
pub mod ids;
pub mod item;
pub mod location;
pub mod movement;
pub mod reader;
pub mod threshold;

pub use alert::{AlertNotification, AlertTransition, Severity};
pub use audit::{ActorContext, AuditEntry, ItemSnapshot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use detection::{plan, DetectionPlan};
pub use error::{DetectionError, Result};
pub use ids::{ItemId, MovementId, NotificationId, ReaderId, TenantId, UserId};
pub use item::{InventoryItem, LifecycleStatus};
pub use location::{project, Location, LocationLabels, LocationView};
pub use movement::{Direction, MovementRecord};
pub use reader::{ReaderConfig, ReaderStatus};
