//! Two-phase hierarchical search.
//!
//! Locations are matched and ranked first. Hotels are consulted only when
//! fewer than [`RESULT_LIMIT`] locations matched, and then only fill the
//! remaining slots before the merged list is ranked again.

use log::debug;
use serde::Serialize;
use wayfare_core::{DestinationStore, MatchFinder, ScoringConfig};

use crate::engine::{ParentScoreCache, ScoreEngine};
use crate::error::SearchError;
use crate::result::{ScoredResult, sort_results};

/// Maximum number of results a search returns.
pub const RESULT_LIMIT: usize = 20;

/// Ranked results plus the match counts of each phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    /// Ranked results, at most [`RESULT_LIMIT`].
    pub results: Vec<ScoredResult>,
    /// Cities and areas matched in the first phase.
    pub location_matches: usize,
    /// Hotels matched in the second phase; zero when it was skipped.
    pub hotel_matches: usize,
}

/// Ranks destinations for free-text queries.
///
/// # Examples
/// ```
/// use wayfare_core::{City, Country, MemoryStore, ScoringConfig};
/// use wayfare_scorer::HierarchicalSearch;
///
/// # fn main() -> Result<(), wayfare_scorer::SearchError> {
/// let store = MemoryStore::new()
///     .with_country(Country { id: 1, name: "France".into(), total_hotels: 320 })
///     .with_city(City { id: 1, name: "Paris".into(), country_id: 1, hotel_count: 320 });
/// let config = ScoringConfig::default();
///
/// let results = HierarchicalSearch::new(&store, &config).search("par")?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].name, "Paris");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HierarchicalSearch<'a, S: ?Sized> {
    store: &'a S,
    config: &'a ScoringConfig,
}

impl<'a, S> HierarchicalSearch<'a, S>
where
    S: DestinationStore + ?Sized,
{
    /// Borrow a store and config for searching.
    #[must_use]
    pub const fn new(store: &'a S, config: &'a ScoringConfig) -> Self {
        Self { store, config }
    }

    /// Ranked results for `query`.
    ///
    /// # Errors
    /// Returns [`SearchError::Store`] when the store fails.
    pub fn search(&self, query: &str) -> Result<Vec<ScoredResult>, SearchError> {
        self.search_report(query).map(|report| report.results)
    }

    /// Ranked results for `query` with per-phase match counts.
    ///
    /// # Errors
    /// Returns [`SearchError::Store`] when the store fails.
    pub fn search_report(&self, query: &str) -> Result<SearchReport, SearchError> {
        let finder = MatchFinder::new(self.store);
        let engine = ScoreEngine::new(self.store, self.config);

        let locations = finder.find_locations(query)?;
        let location_matches = locations.len();
        let mut results: Vec<ScoredResult> = locations
            .iter()
            .map(|candidate| engine.score_location(candidate))
            .collect();
        sort_results(&mut results);

        if results.len() >= RESULT_LIMIT {
            debug!("{location_matches} locations matched; skipping hotels");
            results.truncate(RESULT_LIMIT);
            return Ok(SearchReport {
                results,
                location_matches,
                hotel_matches: 0,
            });
        }

        let slots = RESULT_LIMIT - results.len();
        let hotels = finder.find_hotels(query, None)?;
        let hotel_matches = hotels.len();
        let mut cache = ParentScoreCache::new();
        let mut scored_hotels = hotels
            .iter()
            .map(|candidate| engine.score_hotel(candidate, &mut cache))
            .collect::<Result<Vec<_>, _>>()?;
        sort_results(&mut scored_hotels);
        scored_hotels.truncate(slots);
        debug!(
            "{location_matches} locations matched; filling {} of {slots} slots from {hotel_matches} hotels",
            scored_hotels.len()
        );

        results.append(&mut scored_hotels);
        sort_results(&mut results);
        results.truncate(RESULT_LIMIT);
        Ok(SearchReport {
            results,
            location_matches,
            hotel_matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wayfare_core::test_support::sample_store;
    use wayfare_core::{City, Country, DestinationKind, Hotel, MemoryStore};

    fn names(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    fn crowded_store(cities: u64, hotels: u64) -> MemoryStore {
        let mut store = MemoryStore::new().with_country(Country {
            id: 1,
            name: "Testland".into(),
            total_hotels: cities,
        });
        for id in 1..=cities {
            store = store.with_city(City {
                id,
                name: format!("Spring {id}"),
                country_id: 1,
                hotel_count: id,
            });
        }
        for id in 1..=hotels {
            store = store.with_hotel(Hotel {
                id,
                name: format!("Spring Lodge {id}"),
                city_id: 1,
                area_id: None,
            });
        }
        store
    }

    #[rstest]
    fn locations_rank_before_hotels_for_paris() {
        let store = sample_store();
        let config = ScoringConfig::default();
        let report = HierarchicalSearch::new(&store, &config)
            .search_report("Paris")
            .expect("memory store never fails");
        assert_eq!(report.location_matches, 2);
        assert_eq!(report.hotel_matches, 1);
        assert_eq!(names(&report.results), ["Paris", "Eiffel Tower", "Four Seasons Paris"]);
    }

    #[rstest]
    fn full_location_phase_skips_hotels() {
        let store = crowded_store(25, 5);
        let config = ScoringConfig::default();
        let report = HierarchicalSearch::new(&store, &config)
            .search_report("spring")
            .expect("memory store never fails");
        assert_eq!(report.location_matches, 25);
        assert_eq!(report.hotel_matches, 0);
        assert_eq!(report.results.len(), RESULT_LIMIT);
        assert!(report.results.iter().all(|r| !r.kind.is_hotel()));
    }

    #[rstest]
    fn hotels_only_fill_remaining_slots() {
        let store = crowded_store(15, 12);
        let config = ScoringConfig::default();
        let report = HierarchicalSearch::new(&store, &config)
            .search_report("spring")
            .expect("memory store never fails");
        assert_eq!(report.hotel_matches, 12);
        let hotels = report
            .results
            .iter()
            .filter(|r| r.kind == DestinationKind::Hotel)
            .count();
        assert_eq!(hotels, 5);
        assert_eq!(report.results.len(), RESULT_LIMIT);
    }

    #[rstest]
    #[case("")]
    #[case("zzz")]
    fn unmatched_queries_return_nothing(#[case] query: &str) {
        let store = sample_store();
        let config = ScoringConfig::default();
        let results = HierarchicalSearch::new(&store, &config)
            .search(query)
            .expect("memory store never fails");
        assert!(results.is_empty());
    }
}
