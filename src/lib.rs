//! Facade crate for the Wayfare destination search engine.
//!
//! This crate re-exports the core domain types and the scoring and search
//! API, with the SQLite store behind a feature flag.

#![forbid(unsafe_code)]

pub use wayfare_core::{
    Area, City, ConfigError, Country, CountryBoosts, DestinationKind, DestinationStore,
    Hotel, HotelFactors, HotelWeights, LocationClass, LocationFactors, LocationWeights,
    MatchFinder, MemoryStore, ScoringConfig, SmallCityThreshold, StoreError, classify,
};

#[cfg(feature = "store-sqlite")]
pub use wayfare_core::{SqliteDestinationStore, SqliteDestinationStoreError};

pub use wayfare_scorer::{
    HierarchicalSearch, PersistConfigError, RESULT_LIMIT, ScoreBreakdown, ScoreEngine,
    ScoredResult, SearchError, SearchReport, read_scoring_config, write_scoring_config,
};
