//! Row ↔ domain mapping helpers.
//!
//! The nullable location columns are only ever populated down to the
//! row's granularity; these helpers are the single place that contract is
//! enforced when crossing between SQL rows and the `Location` sum type.

use tagstream_core::location::Location;
use tagstream_core::{DetectionError, LifecycleStatus, ReaderStatus, Result, Severity};
use tagstream_core::movement::Direction;
use uuid::Uuid;

/// Flattened column values of a location.
pub(crate) struct LocationColumns {
    pub granularity: &'static str,
    pub warehouse_id: Uuid,
    pub zone_id: Option<Uuid>,
    pub shelf_id: Option<Uuid>,
    pub bin_id: Option<Uuid>,
}

pub(crate) fn location_to_columns(location: &Location) -> LocationColumns {
    LocationColumns {
        granularity: location.granularity(),
        warehouse_id: location.warehouse_id(),
        zone_id: location.zone_id(),
        shelf_id: location.shelf_id(),
        bin_id: location.bin_id(),
    }
}

pub(crate) fn location_from_columns(
    granularity: &str,
    warehouse_id: Uuid,
    zone_id: Option<Uuid>,
    shelf_id: Option<Uuid>,
    bin_id: Option<Uuid>,
) -> Result<Location> {
    match granularity {
        "warehouse" => Ok(Location::Warehouse { warehouse_id }),
        "zone" => match zone_id {
            Some(zone_id) => Ok(Location::Zone {
                warehouse_id,
                zone_id,
            }),
            None => Err(corrupt("zone row missing zone_id")),
        },
        "shelf" => match (zone_id, shelf_id) {
            (Some(zone_id), Some(shelf_id)) => Ok(Location::Shelf {
                warehouse_id,
                zone_id,
                shelf_id,
            }),
            _ => Err(corrupt("shelf row missing zone_id/shelf_id")),
        },
        "bin" => match (zone_id, shelf_id, bin_id) {
            (Some(zone_id), Some(shelf_id), Some(bin_id)) => Ok(Location::Bin {
                warehouse_id,
                zone_id,
                shelf_id,
                bin_id,
            }),
            _ => Err(corrupt("bin row missing id columns")),
        },
        other => Err(corrupt(&format!("unknown granularity '{other}'"))),
    }
}

fn corrupt(detail: &str) -> DetectionError {
    DetectionError::Store(format!("corrupt location row: {detail}"))
}

pub(crate) fn lifecycle_to_str(status: LifecycleStatus) -> &'static str {
    match status {
        LifecycleStatus::Purchase => "purchase",
        LifecycleStatus::SalePending => "sale_pending",
        LifecycleStatus::Sale => "sale",
        LifecycleStatus::Purchased => "purchased",
    }
}

pub(crate) fn lifecycle_from_str(value: &str) -> Result<LifecycleStatus> {
    match value {
        "purchase" => Ok(LifecycleStatus::Purchase),
        "sale_pending" => Ok(LifecycleStatus::SalePending),
        "sale" => Ok(LifecycleStatus::Sale),
        "purchased" => Ok(LifecycleStatus::Purchased),
        other => Err(DetectionError::Store(format!(
            "unknown lifecycle status '{other}'"
        ))),
    }
}

pub(crate) fn reader_status_from_str(value: &str) -> Result<ReaderStatus> {
    match value {
        "active" => Ok(ReaderStatus::Active),
        "inactive" => Ok(ReaderStatus::Inactive),
        "maintenance" => Ok(ReaderStatus::Maintenance),
        other => Err(DetectionError::Store(format!(
            "unknown reader status '{other}'"
        ))),
    }
}

pub(crate) const fn direction_to_str(direction: Direction) -> &'static str {
    match direction {
        Direction::In => "in",
        Direction::Out => "out",
    }
}

pub(crate) const fn severity_to_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
    }
}

pub(crate) fn quantity_from_db(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| DetectionError::Store(format!("column {column} out of range: {value}")))
}

pub(crate) fn version_from_db(value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| DetectionError::Store(format!("negative version: {value}")))
}

pub(crate) fn version_to_db(value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| DetectionError::Store(format!("version overflow: {value}")))
}
