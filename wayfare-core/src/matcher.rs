//! Multi-strategy text matching over a [`DestinationStore`].
//!
//! Locations are found four ways (city name, area name, country name, parent
//! city name) and de-duplicated by `(kind, id)`, first strategy wins. Hotels
//! are matched by their own name only. Records whose parent city is missing
//! are dropped; any other missing join degrades to empty names and zero
//! factors.

use std::collections::HashSet;

use log::debug;

use crate::candidate::{HotelCandidate, LocationCandidate, MatchStrategy};
use crate::entity::{Area, City, Hotel, LocationRef};
use crate::factors::LocationFactors;
use crate::kind::LocationKind;
use crate::query::PrefixQuery;
use crate::store::{DestinationStore, StoreError};

/// Turns free-text queries into typed candidates.
///
/// # Examples
/// ```
/// use wayfare_core::{City, Country, LocationKind, MatchFinder, MemoryStore};
///
/// # fn main() -> Result<(), wayfare_core::StoreError> {
/// let store = MemoryStore::new()
///     .with_country(Country { id: 1, name: "France".into(), total_hotels: 320 })
///     .with_city(City { id: 1, name: "Paris".into(), country_id: 1, hotel_count: 320 });
/// let finder = MatchFinder::new(&store);
///
/// let found = finder.find_locations("fran")?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].kind, LocationKind::City);
/// assert_eq!(found[0].country_name, "France");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MatchFinder<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> MatchFinder<'a, S>
where
    S: DestinationStore + ?Sized,
{
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Find cities and areas matching `query`.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from the underlying store.
    pub fn find_locations(&self, query: &str) -> Result<Vec<LocationCandidate>, StoreError> {
        let query = PrefixQuery::parse(query);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut keep = |candidate: Option<LocationCandidate>| {
            if let Some(found) = candidate
                && seen.insert((found.kind, found.id))
            {
                candidates.push(found);
            }
        };

        for city in self.store.match_cities_by_name(&query)? {
            keep(Some(self.city_candidate(city, MatchStrategy::CityName)?));
        }
        for area in self.store.match_areas_by_name(&query)? {
            keep(self.area_candidate(area, MatchStrategy::AreaName)?);
        }
        for city in self.store.match_cities_by_country_name(&query)? {
            keep(Some(self.city_candidate(city, MatchStrategy::CountryName)?));
        }
        for area in self.store.match_areas_by_city_name(&query)? {
            keep(self.area_candidate(area, MatchStrategy::ParentCityName)?);
        }

        debug!("query {query:?} matched {} locations", candidates.len());
        Ok(candidates)
    }

    /// Find hotels matching `query`, optionally capped at `limit`.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from the underlying store.
    pub fn find_hotels(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<HotelCandidate>, StoreError> {
        let query = PrefixQuery::parse(query);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates = Vec::new();
        for hotel in self.store.match_hotels_by_name(&query, limit)? {
            if let Some(candidate) = self.hotel_candidate(hotel)? {
                candidates.push(candidate);
            }
        }
        debug!("query {query:?} matched {} hotels", candidates.len());
        Ok(candidates)
    }

    /// Build a candidate for a city, even when its country is unknown.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from the underlying store.
    pub fn city_candidate(
        &self,
        city: City,
        matched_by: MatchStrategy,
    ) -> Result<LocationCandidate, StoreError> {
        let country = self.store.get_country(&city)?;
        let factors = self.location_factors(LocationRef::city(city.id))?;
        Ok(LocationCandidate {
            kind: LocationKind::City,
            id: city.id,
            country_id: country.as_ref().map(|c| c.id),
            country_name: country.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            city_name: city.name.clone(),
            hotel_count: city.hotel_count,
            factors,
            country_total_hotels: country.map_or(0, |c| c.total_hotels),
            parent_city_hotel_count: city.hotel_count,
            name: city.name,
            matched_by,
        })
    }

    /// Build a candidate for an area, or `None` when its city is missing.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from the underlying store.
    pub fn area_candidate(
        &self,
        area: Area,
        matched_by: MatchStrategy,
    ) -> Result<Option<LocationCandidate>, StoreError> {
        let Some(city) = self.store.get_parent_city(&area)? else {
            debug!(
                "skipping area {} ({}): parent city {} is missing",
                area.id, area.name, area.city_id
            );
            return Ok(None);
        };
        let country = self.store.get_country(&city)?;
        let factors = self.location_factors(LocationRef::area(area.id))?;
        Ok(Some(LocationCandidate {
            kind: LocationKind::Area,
            id: area.id,
            name: area.name,
            country_id: country.as_ref().map(|c| c.id),
            country_name: country.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            city_name: city.name,
            hotel_count: area.hotel_count,
            factors,
            country_total_hotels: country.map_or(0, |c| c.total_hotels),
            parent_city_hotel_count: city.hotel_count,
            matched_by,
        }))
    }

    fn hotel_candidate(&self, hotel: Hotel) -> Result<Option<HotelCandidate>, StoreError> {
        let Some(city) = self.store.get_parent_city(&hotel)? else {
            debug!(
                "skipping hotel {} ({}): parent city {} is missing",
                hotel.id, hotel.name, hotel.city_id
            );
            return Ok(None);
        };
        let area = self.store.get_parent_area(&hotel)?;
        if area.is_none()
            && let Some(area_id) = hotel.area_id
        {
            debug!("hotel {} references missing area {area_id}", hotel.id);
        }
        let country = self.store.get_country(&city)?;
        let factors = self
            .store
            .hotel_factors(hotel.id)?
            .unwrap_or_default()
            .sanitised();
        Ok(Some(HotelCandidate {
            id: hotel.id,
            name: hotel.name,
            city_id: city.id,
            city_name: city.name,
            area_id: area.as_ref().map(|a| a.id),
            area_name: area.map(|a| a.name).unwrap_or_default(),
            country_id: city.country_id,
            country_name: country.map(|c| c.name).unwrap_or_default(),
            factors,
            parent_city_hotel_count: city.hotel_count,
        }))
    }

    fn location_factors(
        &self,
        location: LocationRef,
    ) -> Result<LocationFactors, StoreError> {
        Ok(self
            .store
            .location_factors(location)?
            .unwrap_or_default()
            .sanitised())
    }
}
