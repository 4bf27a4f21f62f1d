//! Destination kinds before and after classification.
//!
//! [`StructuralKind`] is the shape of a record in the entity store.
//! [`DestinationKind`] is the effective kind used to pick a weight set once
//! the small-city threshold has been applied.
//!
//! # Examples
//! ```
//! use wayfare_core::DestinationKind;
//!
//! assert_eq!(DestinationKind::SmallCity.as_str(), "small_city");
//! assert_eq!("area".parse::<DestinationKind>(), Ok(DestinationKind::Area));
//! ```

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Structural kind of a stored destination record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StructuralKind {
    /// A city record.
    City,
    /// An area inside a city.
    Area,
    /// A hotel inside a city and optionally an area.
    Hotel,
}

/// Location kinds that carry the four location factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocationKind {
    /// A city.
    City,
    /// An area.
    Area,
}

impl LocationKind {
    /// Structural kind for this location kind.
    #[must_use]
    pub const fn structural(self) -> StructuralKind {
        match self {
            Self::City => StructuralKind::City,
            Self::Area => StructuralKind::Area,
        }
    }
}

/// Effective kind used to select a weight set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DestinationKind {
    /// A city above the small-city threshold.
    City,
    /// A city at or below the small-city threshold.
    SmallCity,
    /// An area whose parent city is above the threshold.
    Area,
    /// An area whose parent city is at or below the threshold.
    SmallArea,
    /// A hotel. Hotels are never reclassified.
    Hotel,
}

impl DestinationKind {
    /// Every kind, in weight-table order.
    pub const ALL: [Self; 5] = [
        Self::City,
        Self::SmallCity,
        Self::Area,
        Self::SmallArea,
        Self::Hotel,
    ];

    /// Return the kind as its configuration key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::SmallCity => "small_city",
            Self::Area => "area",
            Self::SmallArea => "small_area",
            Self::Hotel => "hotel",
        }
    }

    /// Whether this kind is scored with the hotel formula.
    #[must_use]
    pub const fn is_hotel(self) -> bool {
        matches!(self, Self::Hotel)
    }
}

/// Effective kind of a city or area after classification.
///
/// Each variant owns one location weight set in
/// [`ScoringConfig`](crate::ScoringConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocationClass {
    /// A city above the threshold.
    City,
    /// A city at or below the threshold.
    SmallCity,
    /// An area whose parent city is above the threshold.
    Area,
    /// An area whose parent city is at or below the threshold.
    SmallArea,
}

impl LocationClass {
    /// Every location class, in weight-table order.
    pub const ALL: [Self; 4] = [Self::City, Self::SmallCity, Self::Area, Self::SmallArea];
}

impl From<LocationClass> for DestinationKind {
    fn from(value: LocationClass) -> Self {
        match value {
            LocationClass::City => Self::City,
            LocationClass::SmallCity => Self::SmallCity,
            LocationClass::Area => Self::Area,
            LocationClass::SmallArea => Self::SmallArea,
        }
    }
}

impl fmt::Display for LocationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DestinationKind::from(*self).fmt(f)
    }
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::City => "city",
            Self::Area => "area",
            Self::Hotel => "hotel",
        })
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.structural().fmt(f)
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown destination kind '{name}'")]
pub struct ParseKindError {
    /// The rejected input.
    pub name: String,
}

impl FromStr for DestinationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseKindError { name: s.to_owned() })
    }
}
