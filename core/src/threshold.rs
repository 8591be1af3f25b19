//! Edge-triggered low-stock evaluation.
//!
//! The single place the platform decides whether a quantity change crosses
//! the low-stock threshold. Tag detection, manual inventory updates, and
//! outgoing shipments all route through [`evaluate`] so the latch semantics
//! cannot drift between call sites.

use crate::alert::{AlertTransition, Severity};

/// Compute the alert-state transition for a quantity change.
///
/// - `Raise` iff the new quantity is at or below threshold and the latch
///   was not set. Severity is [`Severity::High`] when the item ran out,
///   else [`Severity::Medium`].
/// - `Clear` iff the new quantity is above threshold and the latch was set.
/// - `None` otherwise. The common case is an already-latched item staying
///   below threshold: that returns `None`, which is what suppresses
///   duplicate alerts on successive detections of the same low-stock item.
///
/// The previous quantity does not affect the transition; it is accepted so
/// call sites hand over the full change they observed and for symmetry
/// with the audit snapshot.
#[must_use]
pub const fn evaluate(
    _previous_quantity: u32,
    new_quantity: u32,
    threshold: u32,
    latch_was_set: bool,
) -> AlertTransition {
    if new_quantity <= threshold && !latch_was_set {
        let severity = if new_quantity == 0 {
            Severity::High
        } else {
            Severity::Medium
        };
        AlertTransition::Raise(severity)
    } else if new_quantity > threshold && latch_was_set {
        AlertTransition::Clear
    } else {
        AlertTransition::None
    }
}
