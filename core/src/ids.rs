//! Identifier newtypes.
//!
//! Every identifier the pipeline touches gets its own type so a tenant id
//! can never be passed where an item id is expected. All except
//! [`ReaderId`] wrap a [`Uuid`]; readers are addressed by the external id
//! the physical device reports (an operator-assigned string such as
//! `"UHF-DOCK-03"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id! {
    /// Tenant (company) identifier.
    TenantId
}

uuid_id! {
    /// Inventory item identifier, unique within a tenant.
    ItemId
}

uuid_id! {
    /// User identifier (actors and alert recipients).
    UserId
}

uuid_id! {
    /// Movement ledger entry identifier.
    MovementId
}

uuid_id! {
    /// Alert notification identifier.
    NotificationId
}

/// External identifier of a physical reader, as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReaderId(pub String);

impl ReaderId {
    /// Wrap an external reader identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReaderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
