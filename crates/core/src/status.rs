//! Asset lifecycle status.
//!
//! Each variant's discriminant matches the seed data order (1-based) in the
//! `asset_statuses` lookup table.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $display:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant in lookup-table order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Display name stored in the lookup table.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $display ),+
                }
            }

            /// Identifier form of the variant (`InUse`).
            pub fn ident(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }

            /// Look up a variant by database ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                Self::ALL.iter().copied().find(|s| s.id() == id)
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Where an asset is in its lifecycle.
    AssetStatus {
        InUse = 1 => "In Use",
        InStock = 2 => "In Stock",
        UnderMaintenance = 3 => "Under Maintenance",
        Retired = 4 => "Retired",
    }
}

impl AssetStatus {
    /// Status given to new assets when the caller omits one.
    pub const DEFAULT: AssetStatus = AssetStatus::InStock;

    /// Parse either the display name (`"In Use"`) or the identifier
    /// (`"InUse"`). Matching ignores case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL.iter().copied().find(|s| {
            s.name().eq_ignore_ascii_case(wanted) || s.ident().eq_ignore_ascii_case(wanted)
        })
    }

    /// Like [`AssetStatus::parse`] but fails with a validation error that
    /// lists the accepted values.
    pub fn parse_strict(raw: &str) -> Result<Self, CoreError> {
        Self::parse(raw).ok_or_else(|| {
            let accepted: Vec<&str> = Self::ALL.iter().map(|s| s.name()).collect();
            CoreError::Validation(format!(
                "Invalid status '{raw}'. Must be one of: {}",
                accepted.join(", ")
            ))
        })
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for AssetStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for AssetStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_strict(&raw).map_err(serde::de::Error::custom)
    }
}
