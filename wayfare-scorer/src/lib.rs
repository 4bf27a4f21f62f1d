//! Scoring and ranking for Wayfare destination search.
//!
//! The crate turns the candidates produced by
//! [`MatchFinder`](wayfare_core::MatchFinder) into ranked results:
//! - **Pure formulas**: [`location_score`] and [`hotel_score`] combine
//!   normalized factors with the weight set chosen by classification.
//! - **Score engine**: [`ScoreEngine`] classifies each location against the
//!   small-city threshold, applies any country boost, and scores hotels by
//!   inheriting their parents' scores through a per-call
//!   [`ParentScoreCache`].
//! - **Hierarchical search**: [`HierarchicalSearch`] ranks locations first
//!   and lets hotels fill whatever is left of the [`RESULT_LIMIT`] slots.
//! - **Persistence**: [`write_scoring_config`] and [`read_scoring_config`]
//!   store a [`ScoringConfig`](wayfare_core::ScoringConfig) as JSON or
//!   `bincode`.
//!
//! # Examples
//!
//! ```
//! use wayfare_core::{Area, City, Country, DestinationKind, MemoryStore, ScoringConfig};
//! use wayfare_scorer::HierarchicalSearch;
//!
//! # fn main() -> Result<(), wayfare_scorer::SearchError> {
//! let store = MemoryStore::new()
//!     .with_country(Country { id: 1, name: "France".into(), total_hotels: 320 })
//!     .with_city(City { id: 1, name: "Paris".into(), country_id: 1, hotel_count: 320 })
//!     .with_area(Area { id: 1, name: "Eiffel Tower".into(), city_id: 1, hotel_count: 1 });
//! let config = ScoringConfig::default();
//!
//! let results = HierarchicalSearch::new(&store, &config).search("paris")?;
//! let kinds: Vec<_> = results.iter().map(|r| r.kind).collect();
//! assert_eq!(kinds, [DestinationKind::City, DestinationKind::Area]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod error;
mod persist;
mod result;
mod search;

pub use engine::{
    HOTEL_FACTOR_COUNT, LOCATION_FACTOR_COUNT, ParentScoreCache, ScoreEngine, hotel_score,
    location_score,
};
pub use error::{PersistConfigError, SearchError};
pub use persist::{ConfigFormat, read_scoring_config, write_scoring_config};
pub use result::{ScoreBreakdown, ScoredResult};
pub use search::{HierarchicalSearch, RESULT_LIMIT, SearchReport};
