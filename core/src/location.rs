//! Warehouse location hierarchy.
//!
//! A location is a sum type over the four granularities a reader can be
//! mounted at. Each variant carries exactly the identifiers its level
//! requires: a `Zone` location cannot hold a shelf id, so the
//! "wrong fields populated for this granularity" bug class from the
//! nullable-column representation is unrepresentable here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an inventory item (or a fixed reader) sits in the warehouse
/// hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "granularity", rename_all = "snake_case")]
pub enum Location {
    /// Warehouse-level granularity.
    Warehouse {
        /// Owning warehouse.
        warehouse_id: Uuid,
    },
    /// Zone within a warehouse.
    Zone {
        /// Owning warehouse.
        warehouse_id: Uuid,
        /// Zone within the warehouse.
        zone_id: Uuid,
    },
    /// Shelf within a zone.
    Shelf {
        /// Owning warehouse.
        warehouse_id: Uuid,
        /// Zone within the warehouse.
        zone_id: Uuid,
        /// Shelf within the zone.
        shelf_id: Uuid,
    },
    /// Bin on a shelf, the finest granularity.
    Bin {
        /// Owning warehouse.
        warehouse_id: Uuid,
        /// Zone within the warehouse.
        zone_id: Uuid,
        /// Shelf within the zone.
        shelf_id: Uuid,
        /// Bin on the shelf.
        bin_id: Uuid,
    },
}

impl Location {
    /// The warehouse identifier, present at every granularity.
    #[must_use]
    pub const fn warehouse_id(&self) -> Uuid {
        match *self {
            Self::Warehouse { warehouse_id }
            | Self::Zone { warehouse_id, .. }
            | Self::Shelf { warehouse_id, .. }
            | Self::Bin { warehouse_id, .. } => warehouse_id,
        }
    }

    /// The zone identifier, if this granularity carries one.
    #[must_use]
    pub const fn zone_id(&self) -> Option<Uuid> {
        match *self {
            Self::Warehouse { .. } => None,
            Self::Zone { zone_id, .. }
            | Self::Shelf { zone_id, .. }
            | Self::Bin { zone_id, .. } => Some(zone_id),
        }
    }

    /// The shelf identifier, if this granularity carries one.
    #[must_use]
    pub const fn shelf_id(&self) -> Option<Uuid> {
        match *self {
            Self::Warehouse { .. } | Self::Zone { .. } => None,
            Self::Shelf { shelf_id, .. } | Self::Bin { shelf_id, .. } => Some(shelf_id),
        }
    }

    /// The bin identifier, if this granularity carries one.
    #[must_use]
    pub const fn bin_id(&self) -> Option<Uuid> {
        match *self {
            Self::Bin { bin_id, .. } => Some(bin_id),
            _ => None,
        }
    }

    /// Granularity name, used as the storage discriminant.
    #[must_use]
    pub const fn granularity(&self) -> &'static str {
        match self {
            Self::Warehouse { .. } => "warehouse",
            Self::Zone { .. } => "zone",
            Self::Shelf { .. } => "shelf",
            Self::Bin { .. } => "bin",
        }
    }
}

/// Compute the location an item takes on after being seen by a reader.
///
/// The projection is an identity copy of the reader's fixed location: the
/// output variant always equals the reader's variant. Detection places the
/// item exactly where the reader is mounted, at the reader's granularity.
#[must_use]
pub fn project(reader_fixed: &Location) -> Location {
    reader_fixed.clone()
}

/// Display names for a location, denormalized onto the reader config.
///
/// Used only for shaping responses and realtime broadcasts; identity lives
/// in [`Location`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLabels {
    /// Warehouse display name.
    pub warehouse_name: Option<String>,
    /// Zone display name.
    pub zone_name: Option<String>,
    /// Shelf display name.
    pub shelf_name: Option<String>,
    /// Bin display name.
    pub bin_name: Option<String>,
}

/// Flattened wire form of a location: identifier and display name per
/// level, `null` below the location's granularity.
///
/// This is the shape transports emit; the domain keeps the sum type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    /// Warehouse identifier.
    pub warehouse_id: Option<Uuid>,
    /// Warehouse display name.
    pub warehouse_name: Option<String>,
    /// Zone identifier.
    pub zone_id: Option<Uuid>,
    /// Zone display name.
    pub zone_name: Option<String>,
    /// Shelf identifier.
    pub shelf_id: Option<Uuid>,
    /// Shelf display name.
    pub shelf_name: Option<String>,
    /// Bin identifier.
    pub bin_id: Option<Uuid>,
    /// Bin display name.
    pub bin_name: Option<String>,
}

impl LocationView {
    /// Flatten a location and its labels into the wire form.
    #[must_use]
    pub fn new(location: &Location, labels: &LocationLabels) -> Self {
        Self {
            warehouse_id: Some(location.warehouse_id()),
            warehouse_name: labels.warehouse_name.clone(),
            zone_id: location.zone_id(),
            zone_name: location.zone_id().and(labels.zone_name.clone()),
            shelf_id: location.shelf_id(),
            shelf_name: location.shelf_id().and(labels.shelf_name.clone()),
            bin_id: location.bin_id(),
            bin_name: location.bin_id().and(labels.bin_name.clone()),
        }
    }
}
