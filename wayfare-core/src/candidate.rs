//! Typed match results handed from the matcher to the scorer.

use crate::factors::{HotelFactors, LocationFactors};
use crate::kind::LocationKind;

/// Which matching strategy first surfaced a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchStrategy {
    /// The city's own name matched.
    CityName,
    /// The area's own name matched.
    AreaName,
    /// The city's country name matched.
    CountryName,
    /// The area's parent city name matched.
    ParentCityName,
    /// Loaded by id as the parent of a matched hotel.
    Parent,
}

/// A city or area that matched a query, with everything scoring needs.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCandidate {
    /// City or area.
    pub kind: LocationKind,
    /// Identifier within `kind`.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Country identifier, when the city links to a known country.
    pub country_id: Option<u64>,
    /// Country name, empty when the country is unknown.
    pub country_name: String,
    /// Parent city name for areas; the city's own name for cities.
    pub city_name: String,
    /// Raw hotel count of the location itself.
    pub hotel_count: u64,
    /// Normalized factors, zero when the store has none.
    pub factors: LocationFactors,
    /// Total hotels across the country, zero when unknown.
    pub country_total_hotels: u64,
    /// Hotel count of the city that decides classification.
    ///
    /// Equal to `hotel_count` for cities; the parent city's count for areas.
    pub parent_city_hotel_count: u64,
    /// Strategy that first matched this location.
    pub matched_by: MatchStrategy,
}

impl LocationCandidate {
    /// Hotel count used for small-city classification.
    #[must_use]
    pub const fn classification_basis(&self) -> u64 {
        self.parent_city_hotel_count
    }
}

/// A hotel that matched a query.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelCandidate {
    /// Hotel identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Parent city identifier.
    pub city_id: u64,
    /// Parent city name.
    pub city_name: String,
    /// Parent area identifier, when the hotel has a known area.
    pub area_id: Option<u64>,
    /// Parent area name, empty when there is no area.
    pub area_name: String,
    /// Country identifier of the parent city.
    pub country_id: u64,
    /// Country name, empty when the country is unknown.
    pub country_name: String,
    /// The hotel's own review and outbound factors.
    pub factors: HotelFactors,
    /// Hotel count of the parent city.
    pub parent_city_hotel_count: u64,
}
