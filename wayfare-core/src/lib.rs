//! Core domain types for the Wayfare destination search engine.
//!
//! The crate holds everything that does not depend on how scores are
//! combined: destination records and kinds, normalized factors, weight
//! tables, small-city classification, the [`DestinationStore`] query
//! surface and the [`MatchFinder`] that turns free text into typed
//! candidates.
//!
//! Scoring and ranking live in `wayfare-scorer`; dataset ingestion lives in
//! `wayfare-data`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod candidate;
mod classify;
mod config;
mod entity;
mod factors;
mod kind;
mod matcher;
mod query;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use candidate::{HotelCandidate, LocationCandidate, MatchStrategy};
pub use classify::{
    DEFAULT_SMALL_CITY_THRESHOLD, SmallCityThreshold, classify, classify_location,
};
pub use config::{
    ConfigError, CountryBoosts, HotelWeights, LocationWeights, ScoringConfig, THAILAND_BOOST,
    THAILAND_COUNTRY_ID,
};
pub use entity::{Area, City, CityScoped, Country, EntityRef, Hotel, LocationRef};
pub use factors::{FactorBag, HotelFactors, LocationFactors, MAX_FACTOR, sanitise_factor};
pub use kind::{DestinationKind, LocationClass, LocationKind, ParseKindError, StructuralKind};
pub use matcher::MatchFinder;
pub use query::{PrefixQuery, tokenize};
pub use store::{BackendError, DestinationStore, MemoryStore, StoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteDestinationStore, SqliteDestinationStoreError};
