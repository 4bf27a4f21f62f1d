//! Small-city reclassification.
//!
//! A city whose hotel count is at or below the threshold is scored as a
//! `small_city`. An area follows its parent city: the basis is always the
//! parent city's hotel count, never the area's own. Hotels are never
//! reclassified.

use crate::kind::{DestinationKind, LocationClass, LocationKind, StructuralKind};

/// Default small-city threshold.
pub const DEFAULT_SMALL_CITY_THRESHOLD: i64 = 300;

/// Hotel count at or below which a city counts as small.
///
/// A negative threshold never classifies anything as small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SmallCityThreshold(i64);

impl SmallCityThreshold {
    /// Wrap a raw threshold.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw threshold value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether `hotel_count` is at or below the threshold.
    #[must_use]
    pub fn is_small(self, hotel_count: u64) -> bool {
        u64::try_from(self.0).is_ok_and(|limit| hotel_count <= limit)
    }
}

impl Default for SmallCityThreshold {
    fn default() -> Self {
        Self(DEFAULT_SMALL_CITY_THRESHOLD)
    }
}

impl From<i64> for SmallCityThreshold {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Classify a city or area.
///
/// `basis` is the city's own hotel count for cities and the parent city's
/// hotel count for areas.
///
/// # Examples
/// ```
/// use wayfare_core::{LocationClass, LocationKind, SmallCityThreshold, classify_location};
///
/// let threshold = SmallCityThreshold::new(50);
/// assert_eq!(classify_location(LocationKind::City, 50, threshold), LocationClass::SmallCity);
/// assert_eq!(classify_location(LocationKind::City, 51, threshold), LocationClass::City);
/// ```
#[must_use]
pub fn classify_location(
    kind: LocationKind,
    basis: u64,
    threshold: SmallCityThreshold,
) -> LocationClass {
    let small = threshold.is_small(basis);
    match (kind, small) {
        (LocationKind::City, false) => LocationClass::City,
        (LocationKind::City, true) => LocationClass::SmallCity,
        (LocationKind::Area, false) => LocationClass::Area,
        (LocationKind::Area, true) => LocationClass::SmallArea,
    }
}

/// Classify any structural kind into its effective kind.
///
/// Hotels pass through unchanged regardless of `basis`.
#[must_use]
pub fn classify(
    kind: StructuralKind,
    basis: u64,
    threshold: SmallCityThreshold,
) -> DestinationKind {
    match kind {
        StructuralKind::City => classify_location(LocationKind::City, basis, threshold).into(),
        StructuralKind::Area => classify_location(LocationKind::Area, basis, threshold).into(),
        StructuralKind::Hotel => DestinationKind::Hotel,
    }
}
