//! Ranked output records and their ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use wayfare_core::{DestinationKind, HotelFactors, HotelWeights, LocationFactors, LocationWeights};

/// Factor values and coefficients that produced a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ScoreBreakdown {
    /// A city or area.
    Location {
        /// Normalized factors of the location.
        factors: LocationFactors,
        /// Weight set chosen by classification.
        weights: LocationWeights,
        /// Country boost multiplier, when one applied.
        boost: Option<f64>,
    },
    /// A hotel, carrying the parent scores it inherited.
    Hotel {
        /// Score of the parent city under the same config.
        city_score: f64,
        /// Score of the parent area, zero when the hotel has none.
        area_score: f64,
        /// The hotel's own factors.
        factors: HotelFactors,
        /// Hotel weight set.
        weights: HotelWeights,
    },
}

/// One ranked destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Effective kind after classification.
    pub kind: DestinationKind,
    /// Identifier within the structural kind.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Country name, empty when unknown.
    pub country_name: String,
    /// City name: the city itself, or the parent city of an area or hotel.
    pub city_name: String,
    /// Area name: the area itself, or the parent area of a hotel.
    pub area_name: String,
    /// Raw hotel count for cities and areas; `None` for hotels.
    pub hotel_count: Option<u64>,
    /// Inputs behind `score`.
    pub breakdown: ScoreBreakdown,
    /// Final desirability score.
    pub score: f64,
}

impl ScoredResult {
    /// Ranking order: score descending, then hotel count descending (hotels
    /// count as zero), then name, then id.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.hotel_count.unwrap_or(0).cmp(&self.hotel_count.unwrap_or(0)))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Sort results into ranking order.
pub(crate) fn sort_results(results: &mut [ScoredResult]) {
    results.sort_by(ScoredResult::rank_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wayfare_core::{LocationClass, ScoringConfig};

    fn result(name: &str, id: u64, hotel_count: Option<u64>, score: f64) -> ScoredResult {
        ScoredResult {
            kind: if hotel_count.is_some() {
                DestinationKind::City
            } else {
                DestinationKind::Hotel
            },
            id,
            name: name.to_owned(),
            country_name: String::new(),
            city_name: String::new(),
            area_name: String::new(),
            hotel_count,
            breakdown: ScoreBreakdown::Location {
                factors: LocationFactors::default(),
                weights: *ScoringConfig::default().location_weights(LocationClass::City),
                boost: None,
            },
            score,
        }
    }

    fn names(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    #[rstest]
    fn higher_scores_rank_first() {
        let mut results = vec![result("b", 1, Some(1), 10.0), result("a", 2, Some(1), 20.0)];
        sort_results(&mut results);
        assert_eq!(names(&results), ["a", "b"]);
    }

    #[rstest]
    fn ties_prefer_larger_locations_over_hotels() {
        let mut results = vec![
            result("Hotel", 1, None, 5.0),
            result("Small", 2, Some(3), 5.0),
            result("Large", 3, Some(30), 5.0),
        ];
        sort_results(&mut results);
        assert_eq!(names(&results), ["Large", "Small", "Hotel"]);
    }

    #[rstest]
    fn full_ties_fall_back_to_name_then_id() {
        let mut results = vec![
            result("Same", 9, Some(1), 1.0),
            result("Same", 2, Some(1), 1.0),
            result("Alpha", 5, Some(1), 1.0),
        ];
        sort_results(&mut results);
        let order: Vec<_> = results.iter().map(|r| (r.name.as_str(), r.id)).collect();
        assert_eq!(order, [("Alpha", 5), ("Same", 2), ("Same", 9)]);
    }

    #[rstest]
    fn serialises_kind_and_breakdown_shape() {
        let json = serde_json::to_value(result("Paris", 1, Some(320), 26.5))
            .expect("serialise result");
        assert_eq!(json["kind"], "city");
        assert_eq!(json["breakdown"]["shape"], "location");
        assert_eq!(json["hotel_count"], 320);
    }
}
