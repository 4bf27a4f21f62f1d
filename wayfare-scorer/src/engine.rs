//! Score formulas and the per-candidate score engine.
//!
//! Both formulas divide the weighted sum by the number of factors, not by
//! the sum of the weights, so scores shrink when weights are lowered.

use std::collections::BTreeMap;

use log::debug;
use wayfare_core::{
    DestinationKind, DestinationStore, HotelCandidate, HotelFactors, HotelWeights,
    LocationCandidate, LocationFactors, LocationKind, LocationRef, LocationWeights, MatchFinder,
    MatchStrategy, ScoringConfig, StoreError, classify_location,
};

use crate::result::{ScoreBreakdown, ScoredResult};

/// Divisor of [`location_score`].
pub const LOCATION_FACTOR_COUNT: u32 = 4;

/// Divisor of [`hotel_score`].
pub const HOTEL_FACTOR_COUNT: u32 = 6;

/// Weighted location score: `Σ factor × weight / 4`.
///
/// # Examples
/// ```
/// use wayfare_core::{LocationFactors, LocationWeights};
/// use wayfare_scorer::location_score;
///
/// let factors = LocationFactors {
///     hotel_count: 76.0,
///     country_hotel_count: 100.0,
///     expenditure: 75.0,
///     departure: 65.0,
/// };
/// let weights = LocationWeights::new(1.0, 0.1, 0.1, 0.1)?;
/// assert!((location_score(&factors, &weights) - 25.0).abs() < 1e-9);
/// # Ok::<(), wayfare_core::ConfigError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "scores are weighted sums of normalized factors"
)]
#[must_use]
pub fn location_score(factors: &LocationFactors, weights: &LocationWeights) -> f64 {
    let sum = factors.hotel_count * weights.hotel_count
        + factors.country_hotel_count * weights.country_hotel_count
        + factors.expenditure * weights.expenditure
        + factors.departure * weights.departure;
    sum / f64::from(LOCATION_FACTOR_COUNT)
}

/// Weighted hotel score over the inherited parent scores and the hotel's
/// own factors: `Σ value × weight / 6`.
#[expect(
    clippy::float_arithmetic,
    reason = "scores are weighted sums of normalized factors"
)]
#[must_use]
pub fn hotel_score(
    city_score: f64,
    area_score: f64,
    factors: &HotelFactors,
    weights: &HotelWeights,
) -> f64 {
    let sum = city_score * weights.city_score
        + area_score * weights.area_score
        + factors.agoda * weights.agoda
        + factors.google * weights.google
        + factors.expenditure * weights.expenditure
        + factors.departure * weights.departure;
    sum / f64::from(HOTEL_FACTOR_COUNT)
}

#[expect(clippy::float_arithmetic, reason = "boosts scale a location score")]
fn boosted(score: f64, boost: Option<f64>) -> f64 {
    boost.map_or(score, |multiplier| score * multiplier)
}

/// Parent scores computed during one search, keyed by location.
///
/// A cache must not outlive the call that created it: scores depend on the
/// [`ScoringConfig`] in force.
#[derive(Debug, Clone, Default)]
pub struct ParentScoreCache {
    scores: BTreeMap<LocationRef, f64>,
}

impl ParentScoreCache {
    /// An empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scores: BTreeMap::new(),
        }
    }

    /// Cached score for `location`, if it has been computed.
    #[must_use]
    pub fn get(&self, location: LocationRef) -> Option<f64> {
        self.scores.get(&location).copied()
    }

    /// Number of cached parents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Report whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Scores candidates against one store and config.
#[derive(Debug)]
pub struct ScoreEngine<'a, S: ?Sized> {
    store: &'a S,
    config: &'a ScoringConfig,
}

impl<'a, S> ScoreEngine<'a, S>
where
    S: DestinationStore + ?Sized,
{
    /// Borrow a store and config for scoring.
    #[must_use]
    pub const fn new(store: &'a S, config: &'a ScoringConfig) -> Self {
        Self { store, config }
    }

    /// Classify and score a city or area.
    ///
    /// The weight set follows the effective kind; a configured country boost
    /// multiplies the result.
    #[must_use]
    pub fn score_location(&self, candidate: &LocationCandidate) -> ScoredResult {
        let class = classify_location(
            candidate.kind,
            candidate.classification_basis(),
            self.config.threshold(),
        );
        let weights = *self.config.location_weights(class);
        let boost = candidate
            .country_id
            .and_then(|id| self.config.country_boosts().multiplier(id));
        let score = boosted(location_score(&candidate.factors, &weights), boost);
        let area_name = match candidate.kind {
            LocationKind::Area => candidate.name.clone(),
            LocationKind::City => String::new(),
        };
        ScoredResult {
            kind: class.into(),
            id: candidate.id,
            name: candidate.name.clone(),
            country_name: candidate.country_name.clone(),
            city_name: candidate.city_name.clone(),
            area_name,
            hotel_count: Some(candidate.hotel_count),
            breakdown: ScoreBreakdown::Location {
                factors: candidate.factors,
                weights,
                boost,
            },
            score,
        }
    }

    /// Score a hotel, inheriting its parent city and area scores.
    ///
    /// Parents are loaded from the store and scored with the current config,
    /// once per `cache`. A hotel without an area, or whose area is missing,
    /// inherits an area score of zero.
    ///
    /// # Errors
    /// Propagates [`StoreError`] from parent lookups.
    pub fn score_hotel(
        &self,
        candidate: &HotelCandidate,
        cache: &mut ParentScoreCache,
    ) -> Result<ScoredResult, StoreError> {
        let city_score = self.parent_score(LocationRef::city(candidate.city_id), cache)?;
        let area_score = candidate
            .area_id
            .map(|id| self.parent_score(LocationRef::area(id), cache))
            .transpose()?
            .unwrap_or(0.0);
        let weights = *self.config.hotel_weights();
        let score = hotel_score(city_score, area_score, &candidate.factors, &weights);
        Ok(ScoredResult {
            kind: DestinationKind::Hotel,
            id: candidate.id,
            name: candidate.name.clone(),
            country_name: candidate.country_name.clone(),
            city_name: candidate.city_name.clone(),
            area_name: candidate.area_name.clone(),
            hotel_count: None,
            breakdown: ScoreBreakdown::Hotel {
                city_score,
                area_score,
                factors: candidate.factors,
                weights,
            },
            score,
        })
    }

    fn parent_score(
        &self,
        parent: LocationRef,
        cache: &mut ParentScoreCache,
    ) -> Result<f64, StoreError> {
        if let Some(score) = cache.get(parent) {
            return Ok(score);
        }
        let finder = MatchFinder::new(self.store);
        let candidate = match parent.kind {
            LocationKind::City => self
                .store
                .city(parent.id)?
                .map(|city| finder.city_candidate(city, MatchStrategy::Parent))
                .transpose()?,
            LocationKind::Area => self
                .store
                .area(parent.id)?
                .map(|area| finder.area_candidate(area, MatchStrategy::Parent))
                .transpose()?
                .flatten(),
        };
        let score = candidate.map_or_else(
            || {
                debug!("parent {parent:?} is missing; inheriting zero");
                0.0
            },
            |found| self.score_location(&found).score,
        );
        cache.scores.insert(parent, score);
        Ok(score)
    }
}
