//! Fixtures shared by unit and behaviour tests.
//!
//! [`sample_store`] holds the four-country demo dataset with factors already
//! normalized against it (Paris 320 hotels, largest city New York 420).

use crate::{
    Area, City, Country, Hotel, HotelFactors, LocationFactors, LocationRef, MemoryStore,
};

const fn location(
    hotel_count: f64,
    country_hotel_count: f64,
    expenditure: f64,
    departure: f64,
) -> LocationFactors {
    LocationFactors {
        hotel_count,
        country_hotel_count,
        expenditure,
        departure,
    }
}

const fn hotel(agoda: f64, google: f64, expenditure: f64, departure: f64) -> HotelFactors {
    HotelFactors {
        agoda,
        google,
        expenditure,
        departure,
    }
}

/// Demo dataset: France, United Kingdom, United States and Japan with one
/// city and one area each, plus five hotels.
#[must_use]
pub fn sample_store() -> MemoryStore {
    let countries = [
        (1, "France", 320),
        (2, "United Kingdom", 270),
        (3, "United States", 420),
        (4, "Japan", 380),
    ];
    let cities = [
        (1, "Paris", 320, location(76.0, 100.0, 75.0, 65.0)),
        (2, "London", 270, location(64.0, 100.0, 70.0, 60.0)),
        (3, "New York", 420, location(100.0, 100.0, 85.0, 55.0)),
        (4, "Tokyo", 380, location(90.0, 100.0, 80.0, 70.0)),
    ];
    let areas = [
        (1, "Eiffel Tower", 1, location(0.0, 0.0, 75.0, 65.0)),
        (2, "Buckingham Palace", 2, location(0.0, 0.0, 70.0, 60.0)),
        (3, "Central Park", 3, location(0.0, 0.0, 85.0, 55.0)),
        (4, "Shibuya Crossing", 4, location(0.0, 0.0, 80.0, 70.0)),
    ];
    let hotels = [
        (1, "Hotel Le Meurice", 1, Some(1), hotel(100.0, 95.0, 75.0, 65.0)),
        (2, "The Ritz London", 2, Some(2), hotel(96.0, 97.0, 70.0, 60.0)),
        (3, "The Plaza", 3, Some(3), hotel(92.0, 93.0, 85.0, 55.0)),
        (4, "Park Hyatt Tokyo", 4, Some(4), hotel(94.0, 100.0, 80.0, 70.0)),
        (5, "Four Seasons Paris", 1, None, hotel(97.0, 96.0, 75.0, 65.0)),
    ];

    let mut store = MemoryStore::new();
    for (id, name, total_hotels) in countries {
        store = store.with_country(Country {
            id,
            name: name.to_owned(),
            total_hotels,
        });
    }
    for (id, name, hotel_count, factors) in cities {
        store = store
            .with_city(City {
                id,
                name: name.to_owned(),
                country_id: id,
                hotel_count,
            })
            .with_location_factors(LocationRef::city(id), factors);
    }
    for (id, name, city_id, factors) in areas {
        store = store
            .with_area(Area {
                id,
                name: name.to_owned(),
                city_id,
                hotel_count: 1,
            })
            .with_location_factors(LocationRef::area(id), factors);
    }
    for (id, name, city_id, area_id, factors) in hotels {
        store = store
            .with_hotel(Hotel {
                id,
                name: name.to_owned(),
                city_id,
                area_id,
            })
            .with_hotel_factors(id, factors);
    }
    store
}

/// Persist a [`MemoryStore`] into a SQLite file using the store schema.
///
/// Must stay in sync with `wayfare_data::persist_dataset_to_sqlite`; the
/// data crate's tests compare the two databases built from the sample.
///
/// # Errors
/// Returns any `rusqlite` error raised while writing.
#[cfg(feature = "store-sqlite")]
pub fn write_sqlite_database(
    path: &std::path::Path,
    store: &MemoryStore,
) -> rusqlite::Result<()> {
    use crate::LocationKind;

    let mut connection = rusqlite::Connection::open(path)?;
    let tx = connection.transaction()?;
    tx.execute_batch(crate::store::SQLITE_SCHEMA)?;
    for country in store.countries() {
        tx.execute(
            "INSERT INTO country (id, name, total_hotels) VALUES (?1, ?2, ?3)",
            (country.id, &country.name, country.total_hotels),
        )?;
    }
    for city in store.cities() {
        tx.execute(
            "INSERT INTO city (id, name, country_id, total_hotels) VALUES (?1, ?2, ?3, ?4)",
            (city.id, &city.name, city.country_id, city.hotel_count),
        )?;
    }
    for area in store.areas() {
        tx.execute(
            "INSERT INTO area (id, name, city_id, total_hotels) VALUES (?1, ?2, ?3, ?4)",
            (area.id, &area.name, area.city_id, area.hotel_count),
        )?;
    }
    for hotel in store.hotels() {
        tx.execute(
            "INSERT INTO hotel (id, name, city_id, area_id) VALUES (?1, ?2, ?3, ?4)",
            (hotel.id, &hotel.name, hotel.city_id, hotel.area_id),
        )?;
    }
    for (location, factors) in store.location_factor_entries() {
        let kind = match location.kind {
            LocationKind::City => "city",
            LocationKind::Area => "area",
        };
        tx.execute(
            "INSERT INTO location_factors
                 (kind, location_id, hotel_count, country_hotel_count, expenditure, departure)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                kind,
                location.id,
                factors.hotel_count,
                factors.country_hotel_count,
                factors.expenditure,
                factors.departure,
            ),
        )?;
    }
    for (hotel_id, factors) in store.hotel_factor_entries() {
        tx.execute(
            "INSERT INTO hotel_factors (hotel_id, agoda, google, expenditure, departure)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                hotel_id,
                factors.agoda,
                factors.google,
                factors.expenditure,
                factors.departure,
            ),
        )?;
    }
    tx.execute_batch(crate::store::SQLITE_REBUILD_FTS)?;
    tx.commit()
}
