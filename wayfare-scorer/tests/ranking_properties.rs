//! Property-based tests for hierarchical ranking.
//!
//! # Invariants tested
//!
//! - **Cap:** a search never returns more than [`RESULT_LIMIT`] results.
//! - **Order:** scores are non-increasing.
//! - **Location priority:** a full location phase leaves no room for hotels;
//!   otherwise hotels fill at most the remaining slots, best first.
//! - **Isolation:** hotel coefficients never change location scores.

use std::collections::HashSet;

use proptest::prelude::*;
use proptest::sample::Index;
use wayfare_core::{
    Area, City, Country, DestinationKind, Hotel, HotelFactors, HotelWeights, LocationClass, LocationFactors,
    LocationRef, LocationWeights, MatchFinder, MemoryStore, ScoringConfig, SmallCityThreshold,
};
use wayfare_scorer::{
    HierarchicalSearch, ParentScoreCache, RESULT_LIMIT, ScoreEngine, ScoredResult,
};

const QUERY: &str = "zen";

#[derive(Debug, Clone)]
struct CitySpec {
    hotel_count: u64,
    factors: LocationFactors,
    area: Option<LocationFactors>,
}

#[derive(Debug, Clone)]
struct HotelSpec {
    city: Index,
    in_area: bool,
    factors: HotelFactors,
}

fn factor() -> impl Strategy<Value = f64> + Clone {
    (0_u8..=100).prop_map(f64::from)
}

fn coefficient() -> impl Strategy<Value = f64> + Clone {
    prop::sample::select(vec![0.0, 0.1, 0.25, 0.5, 1.0])
}

fn location_factors() -> impl Strategy<Value = LocationFactors> {
    (factor(), factor(), factor(), factor()).prop_map(
        |(hotel_count, country_hotel_count, expenditure, departure)| LocationFactors {
            hotel_count,
            country_hotel_count,
            expenditure,
            departure,
        },
    )
}

fn hotel_factors() -> impl Strategy<Value = HotelFactors> {
    (factor(), factor(), factor(), factor()).prop_map(|(agoda, google, expenditure, departure)| {
        HotelFactors {
            agoda,
            google,
            expenditure,
            departure,
        }
    })
}

fn city_spec() -> impl Strategy<Value = CitySpec> {
    (0_u64..600, location_factors(), prop::option::of(location_factors())).prop_map(
        |(hotel_count, factors, area)| CitySpec {
            hotel_count,
            factors,
            area,
        },
    )
}

fn hotel_spec() -> impl Strategy<Value = HotelSpec> {
    (any::<Index>(), any::<bool>(), hotel_factors()).prop_map(|(city, in_area, factors)| {
        HotelSpec {
            city,
            in_area,
            factors,
        }
    })
}

fn location_weights() -> impl Strategy<Value = LocationWeights> + Clone {
    prop::array::uniform4(coefficient()).prop_map(|[a, b, c, d]| LocationWeights {
        hotel_count: a,
        country_hotel_count: b,
        expenditure: c,
        departure: d,
    })
}

fn hotel_weights() -> impl Strategy<Value = HotelWeights> {
    prop::array::uniform6(coefficient()).prop_map(|[a, b, c, d, e, f]| HotelWeights {
        city_score: a,
        area_score: b,
        agoda: c,
        google: d,
        expenditure: e,
        departure: f,
    })
}

fn config() -> impl Strategy<Value = ScoringConfig> {
    (
        prop::array::uniform4(location_weights()),
        hotel_weights(),
        -10_i64..600,
    )
        .prop_map(|(locations, hotel, threshold)| {
            let mut config =
                ScoringConfig::default().with_threshold(SmallCityThreshold::new(threshold));
            for (class, weights) in LocationClass::ALL.into_iter().zip(locations) {
                config = config.with_location_weights(class, weights);
            }
            config.with_hotel_weights(hotel)
        })
}

fn build_store(cities: &[CitySpec], hotels: &[HotelSpec]) -> MemoryStore {
    let mut store = MemoryStore::new().with_country(Country {
        id: 1,
        name: "Zenith".into(),
        total_hotels: cities.iter().map(|c| c.hotel_count).sum(),
    });
    for (id, city) in (1_u64..).zip(cities) {
        store = store
            .with_city(City {
                id,
                name: format!("Zen City {id}"),
                country_id: 1,
                hotel_count: city.hotel_count,
            })
            .with_location_factors(LocationRef::city(id), city.factors);
        if let Some(factors) = city.area {
            store = store
                .with_area(Area {
                    id,
                    name: format!("Zen Quarter {id}"),
                    city_id: id,
                    hotel_count: 0,
                })
                .with_location_factors(LocationRef::area(id), factors);
        }
    }
    for (id, hotel) in (1_u64..).zip(hotels) {
        let slot = hotel.city.index(cities.len());
        let city_id = u64::try_from(slot).map_or(1, |offset| offset + 1);
        let has_area = cities.get(slot).is_some_and(|c| c.area.is_some());
        store = store
            .with_hotel(Hotel {
                id,
                name: format!("Zen Hotel {id}"),
                city_id,
                area_id: (hotel.in_area && has_area).then_some(city_id),
            })
            .with_hotel_factors(id, hotel.factors);
    }
    store
}

fn all_hotel_scores(store: &MemoryStore, config: &ScoringConfig) -> Vec<ScoredResult> {
    let engine = ScoreEngine::new(store, config);
    let mut cache = ParentScoreCache::new();
    MatchFinder::new(store)
        .find_hotels(QUERY, None)
        .expect("memory store never fails")
        .iter()
        .map(|hotel| engine.score_hotel(hotel, &mut cache))
        .collect::<Result<_, _>>()
        .expect("memory store never fails")
}

fn location_scores(results: &[ScoredResult]) -> Vec<(DestinationKind, u64, u64)> {
    results
        .iter()
        .filter(|r| !r.kind.is_hotel())
        .map(|r| (r.kind, r.id, r.score.to_bits()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn results_are_capped_and_ordered(
        cities in prop::collection::vec(city_spec(), 1..30),
        hotels in prop::collection::vec(hotel_spec(), 0..30),
        config in config(),
    ) {
        let store = build_store(&cities, &hotels);
        let report = HierarchicalSearch::new(&store, &config)
            .search_report(QUERY)
            .expect("memory store never fails");

        prop_assert!(report.results.len() <= RESULT_LIMIT);
        for pair in report.results.windows(2) {
            if let [first, second] = pair {
                prop_assert!(first.score >= second.score);
            }
        }
    }

    #[test]
    fn hotels_only_fill_remaining_slots_best_first(
        cities in prop::collection::vec(city_spec(), 1..30),
        hotels in prop::collection::vec(hotel_spec(), 0..30),
        config in config(),
    ) {
        let store = build_store(&cities, &hotels);
        let report = HierarchicalSearch::new(&store, &config)
            .search_report(QUERY)
            .expect("memory store never fails");
        let included: Vec<&ScoredResult> =
            report.results.iter().filter(|r| r.kind.is_hotel()).collect();

        if report.location_matches >= RESULT_LIMIT {
            prop_assert!(included.is_empty());
            prop_assert_eq!(report.hotel_matches, 0);
        } else {
            prop_assert!(included.len() <= RESULT_LIMIT - report.location_matches);
            let included_ids: HashSet<u64> = included.iter().map(|r| r.id).collect();
            let floor = included.iter().map(|r| r.score).fold(f64::INFINITY, f64::min);
            for excluded in all_hotel_scores(&store, &config)
                .iter()
                .filter(|r| !included_ids.contains(&r.id))
            {
                prop_assert!(excluded.score <= floor);
            }
        }
    }

    #[test]
    fn hotel_weights_never_move_location_scores(
        cities in prop::collection::vec(city_spec(), 1..30),
        hotels in prop::collection::vec(hotel_spec(), 0..30),
        config in config(),
        replacement in hotel_weights(),
    ) {
        let store = build_store(&cities, &hotels);
        let altered = config.with_hotel_weights(replacement);
        let before = HierarchicalSearch::new(&store, &config)
            .search(QUERY)
            .expect("memory store never fails");
        let after = HierarchicalSearch::new(&store, &altered)
            .search(QUERY)
            .expect("memory store never fails");
        prop_assert_eq!(location_scores(&before), location_scores(&after));
    }
}
