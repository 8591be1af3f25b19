//! Error taxonomy for the detection pipeline.

use thiserror::Error;

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, DetectionError>;

/// Failure modes of the detection pipeline.
///
/// Three categories with different contracts:
///
/// - **Preconditions** (`ReaderNotFound`, `ReaderInactive`,
///   `TagNotRegistered`): reported synchronously to the caller before any
///   state is mutated; never retried by the engine.
/// - **`Conflict`**: the optimistic item write lost its race more times
///   than the retry bound allows.
/// - **System errors** (`Store`, `Internal`): infrastructure failures on
///   the authoritative path. Side-effect failures are *not* represented
///   here; they are logged and absorbed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// No reader with this external id is registered for the tenant.
    #[error("Reader '{reader_id}' not found")]
    ReaderNotFound {
        /// External reader identifier as reported.
        reader_id: String,
    },

    /// The reader exists but is not accepting detections.
    #[error("Reader '{reader_id}' is {status}")]
    ReaderInactive {
        /// External reader identifier as reported.
        reader_id: String,
        /// Reported status, `inactive` or `maintenance`.
        status: String,
    },

    /// The tag is not bound to any inventory item in the tenant.
    #[error("Tag '{tag_id}' is not registered")]
    TagNotRegistered {
        /// The unrecognized tag identifier.
        tag_id: String,
    },

    /// A compare-and-swap write found a newer stored version. Raw signal
    /// from the store; the engine retries and surfaces [`Self::Conflict`]
    /// when the bound is exhausted.
    #[error("Item version mismatch")]
    VersionMismatch,

    /// The optimistic item write kept losing to concurrent updates.
    #[error("Item update conflicted after {attempts} attempts")]
    Conflict {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Persistence-layer failure on the authoritative path.
    #[error("Store error: {0}")]
    Store(String),

    /// Unexpected internal failure.
    #[error("Internal error")]
    Internal,
}

impl DetectionError {
    /// Whether this is a precondition rejection: the caller's reader or
    /// tag registration is wrong and no state was touched.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ReaderNotFound { .. } | Self::ReaderInactive { .. } | Self::TagNotRegistered { .. }
        )
    }

    /// Whether this is a concurrency conflict, either the raw store
    /// signal or the surfaced retries-exhausted form.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionMismatch | Self::Conflict { .. })
    }
}
