//! Turn raw dataset rows into store entities and 0 to 100 factors.
//!
//! Hotel counts become percentiles of the busiest city, globally and within
//! each country. Review scores become percentiles of the best score per
//! source. Outbound indicators are truncated and inherited by every city,
//! area and hotel of the country.
#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};

use log::{info, warn};
use wayfare_core::{
    Area, City, Country, Hotel, HotelFactors, LocationFactors, LocationRef, MAX_FACTOR,
    MemoryStore, sanitise_factor,
};

use crate::dataset::{CountryOutboundRecord, Dataset, HotelScoreRecord};

/// Busiest-city hotel count a country needs before its cities receive a
/// country-relative percentile.
pub const COUNTRY_RELATIVE_MINIMUM: u64 = 200;

/// A dataset with dangling records removed and factors computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalisedDataset {
    /// Countries with their summed hotel totals.
    pub countries: Vec<Country>,
    /// Cities whose country exists.
    pub cities: Vec<City>,
    /// Areas whose city exists, with derived hotel counts.
    pub areas: Vec<Area>,
    /// Hotels whose city exists.
    pub hotels: Vec<Hotel>,
    /// Raw review scores of kept hotels.
    pub hotel_scores: Vec<HotelScoreRecord>,
    /// Raw outbound indicators of kept countries.
    pub country_outbound: Vec<CountryOutboundRecord>,
    /// Normalized factors per city and area.
    pub location_factors: BTreeMap<LocationRef, LocationFactors>,
    /// Normalized factors per hotel.
    pub hotel_factors: BTreeMap<u64, HotelFactors>,
}

impl NormalisedDataset {
    /// Load every entity and factor into a [`MemoryStore`].
    #[must_use]
    pub fn to_memory_store(&self) -> MemoryStore {
        let mut store = MemoryStore::new();
        for country in &self.countries {
            store = store.with_country(country.clone());
        }
        for city in &self.cities {
            store = store.with_city(city.clone());
        }
        for area in &self.areas {
            store = store.with_area(area.clone());
        }
        for hotel in &self.hotels {
            store = store.with_hotel(hotel.clone());
        }
        for (location, factors) in &self.location_factors {
            store = store.with_location_factors(*location, *factors);
        }
        for (hotel_id, factors) in &self.hotel_factors {
            store = store.with_hotel_factors(*hotel_id, *factors);
        }
        store
    }
}

/// `trunc(count / max × 100)` capped at 100; `max` must be positive.
fn count_percentile(count: u64, max: u64) -> f64 {
    let percent = count.saturating_mul(100) / max.max(1);
    u8::try_from(percent.min(100)).map_or(MAX_FACTOR, f64::from)
}

/// Country-relative percentile, or 0 unless the country's busiest city
/// exceeds [`COUNTRY_RELATIVE_MINIMUM`].
fn country_percentile(count: u64, busiest_in_country: u64) -> f64 {
    if busiest_in_country > COUNTRY_RELATIVE_MINIMUM {
        count_percentile(count, busiest_in_country)
    } else {
        0.0
    }
}

fn score_percentile(score: Option<f64>, max: f64) -> f64 {
    score.map_or(0.0, |value| sanitise_factor((value / max * 100.0).trunc()))
}

fn outbound_factor(value: Option<f64>) -> f64 {
    value.map_or(0.0, |raw| sanitise_factor(raw.trunc()))
}

/// Highest positive finite score, or 100 when there is none.
fn review_maximum(scores: impl Iterator<Item = Option<f64>>) -> f64 {
    scores
        .flatten()
        .filter(|value| value.is_finite() && *value > 0.0)
        .fold(None, |max: Option<f64>, value| {
            Some(max.map_or(value, |current| current.max(value)))
        })
        .unwrap_or(MAX_FACTOR)
}

/// Normalize a raw dataset.
///
/// Cities without a known country, and areas or hotels without a known
/// city, are dropped with a warning. A hotel naming an unknown area is kept
/// without its area.
#[must_use]
pub fn normalise(dataset: &Dataset) -> NormalisedDataset {
    let country_names: BTreeMap<u64, &str> = dataset
        .countries
        .iter()
        .map(|country| (country.id, country.name.as_str()))
        .collect();

    let mut cities: BTreeMap<u64, City> = BTreeMap::new();
    for record in &dataset.cities {
        if !country_names.contains_key(&record.country_id) {
            warn!(
                "dropping city {} ({}): unknown country {}",
                record.id, record.name, record.country_id
            );
            continue;
        }
        cities.insert(
            record.id,
            City {
                id: record.id,
                name: record.name.clone(),
                country_id: record.country_id,
                hotel_count: record.total_hotels,
            },
        );
    }

    let mut areas: BTreeMap<u64, Area> = BTreeMap::new();
    for record in &dataset.areas {
        if !cities.contains_key(&record.city_id) {
            warn!(
                "dropping area {} ({}): unknown city {}",
                record.id, record.name, record.city_id
            );
            continue;
        }
        areas.insert(
            record.id,
            Area {
                id: record.id,
                name: record.name.clone(),
                city_id: record.city_id,
                hotel_count: 0,
            },
        );
    }

    let mut hotels: BTreeMap<u64, Hotel> = BTreeMap::new();
    for record in &dataset.hotels {
        if !cities.contains_key(&record.city_id) {
            warn!(
                "dropping hotel {} ({}): unknown city {}",
                record.id, record.name, record.city_id
            );
            continue;
        }
        let area_id = record.area_id.filter(|area_id| {
            let known = areas.contains_key(area_id);
            if !known {
                warn!("hotel {} references unknown area {area_id}", record.id);
            }
            known
        });
        hotels.insert(
            record.id,
            Hotel {
                id: record.id,
                name: record.name.clone(),
                city_id: record.city_id,
                area_id,
            },
        );
    }

    for area_id in hotels.values().filter_map(|hotel| hotel.area_id) {
        if let Some(area) = areas.get_mut(&area_id) {
            area.hotel_count += 1;
        }
    }

    let mut country_totals: BTreeMap<u64, u64> = BTreeMap::new();
    let mut country_busiest: BTreeMap<u64, u64> = BTreeMap::new();
    for city in cities.values() {
        let total = country_totals.entry(city.country_id).or_default();
        *total = total.saturating_add(city.hotel_count);
        let busiest = country_busiest.entry(city.country_id).or_default();
        *busiest = (*busiest).max(city.hotel_count);
    }
    let busiest_city = cities
        .values()
        .map(|city| city.hotel_count)
        .max()
        .unwrap_or(0)
        .max(1);

    let country_outbound: Vec<CountryOutboundRecord> = dataset
        .country_outbound
        .iter()
        .filter(|record| country_names.contains_key(&record.country_id))
        .cloned()
        .collect();
    let outbound: BTreeMap<u64, (f64, f64)> = country_outbound
        .iter()
        .map(|record| {
            (
                record.country_id,
                (
                    outbound_factor(record.expenditure_score),
                    outbound_factor(record.departure_score),
                ),
            )
        })
        .collect();
    let outbound_for = |country_id: u64| outbound.get(&country_id).copied().unwrap_or_default();

    let mut location_factors = BTreeMap::new();
    for city in cities.values() {
        let busiest_in_country = country_busiest.get(&city.country_id).copied().unwrap_or(0);
        let (expenditure, departure) = outbound_for(city.country_id);
        location_factors.insert(
            LocationRef::city(city.id),
            LocationFactors {
                hotel_count: count_percentile(city.hotel_count, busiest_city),
                country_hotel_count: country_percentile(city.hotel_count, busiest_in_country),
                expenditure,
                departure,
            },
        );
    }
    for area in areas.values() {
        let country_id = cities.get(&area.city_id).map_or(0, |city| city.country_id);
        let busiest_in_country = country_busiest.get(&country_id).copied().unwrap_or(0);
        let (expenditure, departure) = outbound_for(country_id);
        location_factors.insert(
            LocationRef::area(area.id),
            LocationFactors {
                hotel_count: count_percentile(area.hotel_count, busiest_city),
                country_hotel_count: country_percentile(area.hotel_count, busiest_in_country),
                expenditure,
                departure,
            },
        );
    }

    let hotel_scores: Vec<HotelScoreRecord> = dataset
        .hotel_scores
        .iter()
        .filter(|record| hotels.contains_key(&record.hotel_id))
        .cloned()
        .collect();
    let best_agoda = review_maximum(hotel_scores.iter().map(|s| s.agoda_score));
    let best_google = review_maximum(hotel_scores.iter().map(|s| s.google_score));
    let scores_by_hotel: BTreeMap<u64, &HotelScoreRecord> = hotel_scores
        .iter()
        .map(|record| (record.hotel_id, record))
        .collect();

    let mut hotel_factors = BTreeMap::new();
    for hotel in hotels.values() {
        let scores = scores_by_hotel.get(&hotel.id);
        let country_id = cities.get(&hotel.city_id).map_or(0, |city| city.country_id);
        let (expenditure, departure) = outbound_for(country_id);
        hotel_factors.insert(
            hotel.id,
            HotelFactors {
                agoda: score_percentile(scores.and_then(|s| s.agoda_score), best_agoda),
                google: score_percentile(scores.and_then(|s| s.google_score), best_google),
                expenditure,
                departure,
            },
        );
    }

    let countries: Vec<Country> = country_names
        .iter()
        .map(|(&id, &name)| Country {
            id,
            name: name.to_owned(),
            total_hotels: country_totals.get(&id).copied().unwrap_or(0),
        })
        .collect();

    info!(
        "normalised {} countries, {} cities, {} areas, {} hotels",
        countries.len(),
        cities.len(),
        areas.len(),
        hotels.len()
    );

    let dropped_scores: BTreeSet<u64> = dataset
        .hotel_scores
        .iter()
        .map(|record| record.hotel_id)
        .filter(|id| !hotels.contains_key(id))
        .collect();
    if !dropped_scores.is_empty() {
        warn!("dropping review scores for unknown hotels {dropped_scores:?}");
    }

    NormalisedDataset {
        countries,
        cities: cities.into_values().collect(),
        areas: areas.into_values().collect(),
        hotels: hotels.into_values().collect(),
        hotel_scores,
        country_outbound,
        location_factors,
        hotel_factors,
    }
}
