//! Fixed reader configuration.

use crate::ids::{ReaderId, TenantId};
use crate::location::{Location, LocationLabels};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational status of a physical reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderStatus {
    /// Accepting detections.
    Active,
    /// Disabled by an operator; detections are rejected.
    Inactive,
    /// Under maintenance; detections are rejected.
    Maintenance,
}

/// Configuration of a fixed UHF/RFID reader.
///
/// A reader is mounted at a known point in the location hierarchy; its
/// `fixed_location` variant only changes through an explicit
/// reconfiguration, which is outside this pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderConfig {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// External identifier the device reports with each read.
    pub external_id: ReaderId,
    /// Operator-facing name, referenced in movement reason text.
    pub name: String,
    /// Operational status.
    pub status: ReaderStatus,
    /// Mount point in the warehouse hierarchy.
    pub fixed_location: Location,
    /// Display names for the mount point, denormalized for response
    /// shaping.
    pub location_labels: LocationLabels,
    /// Last time this reader reported a detection.
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl ReaderConfig {
    /// Whether detections from this reader are accepted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, ReaderStatus::Active)
    }

    /// Lowercase status name, used in rejection messages.
    #[must_use]
    pub const fn status_name(&self) -> &'static str {
        match self.status {
            ReaderStatus::Active => "active",
            ReaderStatus::Inactive => "inactive",
            ReaderStatus::Maintenance => "maintenance",
        }
    }
}
