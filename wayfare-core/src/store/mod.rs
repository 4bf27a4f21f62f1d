//! Read-only access to destinations and their normalized factors.
//!
//! [`DestinationStore`] is the narrow query surface the matcher and scorer
//! rely on. Implementations own text matching (prefix semantics described
//! in [`PrefixQuery`]) and foreign-key lookups; they never score.

use thiserror::Error;

use crate::entity::{Area, City, CityScoped, Country, EntityRef, Hotel, LocationRef};
use crate::factors::{FactorBag, HotelFactors, LocationFactors};
use crate::query::PrefixQuery;

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{
    SQLITE_REBUILD_FTS, SQLITE_SCHEMA, SqliteDestinationStore, SqliteDestinationStoreError,
};

/// Boxed backend error carried by [`StoreError::Query`].
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by a [`DestinationStore`] query.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed while running a query.
    #[error("destination store query failed: {operation}")]
    Query {
        /// Description of the failed operation.
        operation: &'static str,
        /// Backend error.
        #[source]
        source: BackendError,
    },
}

impl StoreError {
    /// Wrap a backend error for `operation`.
    pub fn query<E>(operation: &'static str, source: E) -> Self
    where
        E: Into<BackendError>,
    {
        Self::Query {
            operation,
            source: source.into(),
        }
    }
}

/// Read-only destination lookups.
///
/// Match methods return records whose names satisfy the query; ordering is
/// by identifier so results are reproducible. Lookups return `Ok(None)` for
/// unknown identifiers, which callers treat as a data-quality gap rather
/// than a failure.
///
/// # Examples
///
/// ```rust
/// use wayfare_core::{City, Country, DestinationStore, MemoryStore, PrefixQuery};
///
/// # fn main() -> Result<(), wayfare_core::StoreError> {
/// let store = MemoryStore::new()
///     .with_country(Country { id: 1, name: "France".into(), total_hotels: 320 })
///     .with_city(City { id: 1, name: "Paris".into(), country_id: 1, hotel_count: 320 });
///
/// let cities = store.match_cities_by_country_name(&PrefixQuery::parse("fra"))?;
/// assert_eq!(cities.len(), 1);
/// assert_eq!(store.get_country(&cities[0])?.map(|c| c.name), Some("France".into()));
/// # Ok(())
/// # }
/// ```
pub trait DestinationStore {
    /// Cities whose own name matches.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn match_cities_by_name(&self, query: &PrefixQuery) -> Result<Vec<City>, StoreError>;

    /// Areas whose own name matches.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn match_areas_by_name(&self, query: &PrefixQuery) -> Result<Vec<Area>, StoreError>;

    /// Cities whose country's name matches.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn match_cities_by_country_name(&self, query: &PrefixQuery)
    -> Result<Vec<City>, StoreError>;

    /// Areas whose parent city's name matches.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn match_areas_by_city_name(&self, query: &PrefixQuery) -> Result<Vec<Area>, StoreError>;

    /// Hotels whose own name matches, optionally capped at `limit` rows.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn match_hotels_by_name(
        &self,
        query: &PrefixQuery,
        limit: Option<usize>,
    ) -> Result<Vec<Hotel>, StoreError>;

    /// Look up a city.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn city(&self, id: u64) -> Result<Option<City>, StoreError>;

    /// Look up an area.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn area(&self, id: u64) -> Result<Option<Area>, StoreError>;

    /// Look up a country.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn country(&self, id: u64) -> Result<Option<Country>, StoreError>;

    /// Normalized factors of a city or area.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn location_factors(&self, location: LocationRef)
    -> Result<Option<LocationFactors>, StoreError>;

    /// Normalized factors of a hotel.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn hotel_factors(&self, hotel_id: u64) -> Result<Option<HotelFactors>, StoreError>;

    /// Normalized factors of any destination.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn get_normalized_factors(&self, entity: EntityRef) -> Result<Option<FactorBag>, StoreError> {
        match entity {
            EntityRef::Location(location) => Ok(self
                .location_factors(location)?
                .map(FactorBag::Location)),
            EntityRef::Hotel(id) => Ok(self.hotel_factors(id)?.map(FactorBag::Hotel)),
        }
    }

    /// Parent city of an area or hotel.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn get_parent_city(&self, child: &dyn CityScoped) -> Result<Option<City>, StoreError> {
        self.city(child.city_id())
    }

    /// Parent area of a hotel, if it has one.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn get_parent_area(&self, hotel: &Hotel) -> Result<Option<Area>, StoreError> {
        match hotel.area_id {
            Some(id) => self.area(id),
            None => Ok(None),
        }
    }

    /// Country of a city.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend fails.
    fn get_country(&self, city: &City) -> Result<Option<Country>, StoreError> {
        self.country(city.country_id)
    }
}
