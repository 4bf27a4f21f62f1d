//! In-memory destination store.

use std::collections::BTreeMap;

use crate::entity::{Area, City, Country, Hotel, LocationRef};
use crate::factors::{HotelFactors, LocationFactors};
use crate::query::PrefixQuery;

use super::{DestinationStore, StoreError};

/// A destination store held entirely in memory.
///
/// Useful for tests, fixtures and small embedded datasets. Records are kept
/// in id order so match results are deterministic. Nothing checks foreign
/// keys on insert, which lets callers model dangling references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    countries: BTreeMap<u64, Country>,
    cities: BTreeMap<u64, City>,
    areas: BTreeMap<u64, Area>,
    hotels: BTreeMap<u64, Hotel>,
    location_factors: BTreeMap<LocationRef, LocationFactors>,
    hotel_factors: BTreeMap<u64, HotelFactors>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a country.
    #[must_use]
    pub fn with_country(mut self, country: Country) -> Self {
        self.countries.insert(country.id, country);
        self
    }

    /// Add or replace a city.
    #[must_use]
    pub fn with_city(mut self, city: City) -> Self {
        self.cities.insert(city.id, city);
        self
    }

    /// Add or replace an area.
    #[must_use]
    pub fn with_area(mut self, area: Area) -> Self {
        self.areas.insert(area.id, area);
        self
    }

    /// Add or replace a hotel.
    #[must_use]
    pub fn with_hotel(mut self, hotel: Hotel) -> Self {
        self.hotels.insert(hotel.id, hotel);
        self
    }

    /// Attach normalized factors to a city or area.
    #[must_use]
    pub fn with_location_factors(mut self, location: LocationRef, factors: LocationFactors) -> Self {
        self.location_factors.insert(location, factors);
        self
    }

    /// Attach normalized factors to a hotel.
    #[must_use]
    pub fn with_hotel_factors(mut self, hotel_id: u64, factors: HotelFactors) -> Self {
        self.hotel_factors.insert(hotel_id, factors);
        self
    }

    /// Stored countries in id order.
    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.countries.values()
    }

    /// Stored cities in id order.
    pub fn cities(&self) -> impl Iterator<Item = &City> {
        self.cities.values()
    }

    /// Stored areas in id order.
    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.values()
    }

    /// Stored hotels in id order.
    pub fn hotels(&self) -> impl Iterator<Item = &Hotel> {
        self.hotels.values()
    }

    /// Stored location factors keyed by location.
    pub fn location_factor_entries(&self) -> impl Iterator<Item = (LocationRef, LocationFactors)> + '_ {
        self.location_factors
            .iter()
            .map(|(location, factors)| (*location, *factors))
    }

    /// Stored hotel factors keyed by hotel id.
    pub fn hotel_factor_entries(&self) -> impl Iterator<Item = (u64, HotelFactors)> + '_ {
        self.hotel_factors.iter().map(|(id, factors)| (*id, *factors))
    }

    fn cities_where<F>(&self, predicate: F) -> Vec<City>
    where
        F: Fn(&City) -> bool,
    {
        self.cities
            .values()
            .filter(|city| predicate(city))
            .cloned()
            .collect()
    }

    fn areas_where<F>(&self, predicate: F) -> Vec<Area>
    where
        F: Fn(&Area) -> bool,
    {
        self.areas
            .values()
            .filter(|area| predicate(area))
            .cloned()
            .collect()
    }
}

impl DestinationStore for MemoryStore {
    fn match_cities_by_name(&self, query: &PrefixQuery) -> Result<Vec<City>, StoreError> {
        Ok(self.cities_where(|city| query.matches(&city.name)))
    }

    fn match_areas_by_name(&self, query: &PrefixQuery) -> Result<Vec<Area>, StoreError> {
        Ok(self.areas_where(|area| query.matches(&area.name)))
    }

    fn match_cities_by_country_name(
        &self,
        query: &PrefixQuery,
    ) -> Result<Vec<City>, StoreError> {
        Ok(self.cities_where(|city| {
            self.countries
                .get(&city.country_id)
                .is_some_and(|country| query.matches(&country.name))
        }))
    }

    fn match_areas_by_city_name(&self, query: &PrefixQuery) -> Result<Vec<Area>, StoreError> {
        Ok(self.areas_where(|area| {
            self.cities
                .get(&area.city_id)
                .is_some_and(|city| query.matches(&city.name))
        }))
    }

    fn match_hotels_by_name(
        &self,
        query: &PrefixQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Hotel>, StoreError> {
        Ok(self
            .hotels
            .values()
            .filter(|hotel| query.matches(&hotel.name))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn city(&self, id: u64) -> Result<Option<City>, StoreError> {
        Ok(self.cities.get(&id).cloned())
    }

    fn area(&self, id: u64) -> Result<Option<Area>, StoreError> {
        Ok(self.areas.get(&id).cloned())
    }

    fn country(&self, id: u64) -> Result<Option<Country>, StoreError> {
        Ok(self.countries.get(&id).cloned())
    }

    fn location_factors(
        &self,
        location: LocationRef,
    ) -> Result<Option<LocationFactors>, StoreError> {
        Ok(self.location_factors.get(&location).copied())
    }

    fn hotel_factors(&self, hotel_id: u64) -> Result<Option<HotelFactors>, StoreError> {
        Ok(self.hotel_factors.get(&hotel_id).copied())
    }
}
