//! Stored destination records.
//!
//! These are read-only snapshots of what the entity store holds. Hotel
//! counts are raw; normalized factors live alongside in
//! [`crate::factors`].

use crate::kind::{LocationKind, StructuralKind};

/// A country and the sum of its cities' hotel counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Country {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Aggregate hotel count across the country's cities.
    pub total_hotels: u64,
}

/// A city within a country.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Owning country.
    pub country_id: u64,
    /// Number of hotels in the city.
    pub hotel_count: u64,
}

/// A named area inside a city.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Parent city.
    pub city_id: u64,
    /// Number of hotels located in the area.
    pub hotel_count: u64,
}

/// A hotel within a city and, optionally, an area.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hotel {
    /// Unique identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Parent city.
    pub city_id: u64,
    /// Parent area, when the hotel sits in one.
    pub area_id: Option<u64>,
}

/// Records that belong to a parent city.
pub trait CityScoped {
    /// Identifier of the parent city.
    fn city_id(&self) -> u64;
}

impl CityScoped for Area {
    fn city_id(&self) -> u64 {
        self.city_id
    }
}

impl CityScoped for Hotel {
    fn city_id(&self) -> u64 {
        self.city_id
    }
}

/// Reference to a city or area by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationRef {
    /// Location kind.
    pub kind: LocationKind,
    /// Identifier within that kind.
    pub id: u64,
}

impl LocationRef {
    /// Reference a city.
    #[must_use]
    pub const fn city(id: u64) -> Self {
        Self {
            kind: LocationKind::City,
            id,
        }
    }

    /// Reference an area.
    #[must_use]
    pub const fn area(id: u64) -> Self {
        Self {
            kind: LocationKind::Area,
            id,
        }
    }
}

/// Reference to any stored destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A city or area.
    Location(LocationRef),
    /// A hotel identifier.
    Hotel(u64),
}

impl EntityRef {
    /// Structural kind of the referenced record.
    #[must_use]
    pub const fn kind(self) -> StructuralKind {
        match self {
            Self::Location(location) => location.kind.structural(),
            Self::Hotel(_) => StructuralKind::Hotel,
        }
    }
}

impl From<LocationRef> for EntityRef {
    fn from(value: LocationRef) -> Self {
        Self::Location(value)
    }
}
