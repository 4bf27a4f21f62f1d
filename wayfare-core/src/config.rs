//! Factor weights and the immutable scoring configuration.
//!
//! A [`ScoringConfig`] holds one [`LocationWeights`] set per
//! [`LocationClass`], one [`HotelWeights`] set, the small-city threshold and
//! an optional country boost table. It is built once and passed by
//! reference into every search; "changing" a weight produces a new value.
//!
//! Scores divide by the number of factors (4 or 6), not by the sum of the
//! coefficients. Coefficient magnitude alone therefore sets the ceiling of
//! each kind: all-ones reaches 100, while a set of small coefficients keeps
//! that kind below the others.
//!
//! # Examples
//! ```
//! use wayfare_core::{LocationClass, LocationWeights, ScoringConfig};
//!
//! # fn main() -> Result<(), wayfare_core::ConfigError> {
//! let base = ScoringConfig::default();
//! let tuned = base.with_location_weights(
//!     LocationClass::City,
//!     LocationWeights::new(1.0, 0.5, 1.0, 0.0)?,
//! );
//! assert_ne!(base, tuned);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::classify::SmallCityThreshold;
use crate::kind::{DestinationKind, LocationClass};

/// Errors raised while building a scoring configuration.
///
/// All of these are fatal: a search never starts with an incomplete or
/// out-of-range weight table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A required kind has no weight entry.
    #[error("weights missing for kind {kind}")]
    MissingKind {
        /// Kind without weights.
        kind: DestinationKind,
    },
    /// A weight entry names an unknown kind.
    #[error("weights supplied for unknown kind '{name}'")]
    UnknownKind {
        /// Rejected key.
        name: String,
    },
    /// A weight vector has the wrong number of coefficients.
    #[error("kind {kind} expects {expected} coefficients, found {found}")]
    WrongArity {
        /// Kind whose vector was malformed.
        kind: DestinationKind,
        /// Required coefficient count.
        expected: usize,
        /// Supplied coefficient count.
        found: usize,
    },
    /// A coefficient is not finite or lies outside `0.0..=1.0`.
    #[error("coefficient {coefficient} = {value} is outside 0..=1")]
    CoefficientOutOfRange {
        /// Coefficient name.
        coefficient: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A country boost multiplier is not finite or is negative.
    #[error("boost {multiplier} for country {country_id} must be finite and non-negative")]
    InvalidBoost {
        /// Boosted country.
        country_id: u64,
        /// Rejected multiplier.
        multiplier: f64,
    },
}

fn check_coefficient(coefficient: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::CoefficientOutOfRange { coefficient, value })
    }
}

/// Coefficients for the four location factors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct LocationWeights {
    /// Weight of the global hotel-count percentile.
    pub hotel_count: f64,
    /// Weight of the country-relative hotel-count percentile.
    pub country_hotel_count: f64,
    /// Weight of the outbound expenditure score.
    pub expenditure: f64,
    /// Weight of the outbound departure score.
    pub departure: f64,
}

impl LocationWeights {
    /// Coefficient names in vector order.
    pub const COEFFICIENTS: [&'static str; 4] =
        ["hotel_count", "country_hotel_count", "expenditure", "departure"];

    /// Build a validated weight set.
    ///
    /// # Errors
    /// Returns [`ConfigError::CoefficientOutOfRange`] for any value outside
    /// `0.0..=1.0`.
    pub fn new(
        hotel_count: f64,
        country_hotel_count: f64,
        expenditure: f64,
        departure: f64,
    ) -> Result<Self, ConfigError> {
        let weights = Self {
            hotel_count,
            country_hotel_count,
            expenditure,
            departure,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Build from a coefficient vector in [`Self::COEFFICIENTS`] order.
    ///
    /// # Errors
    /// Returns [`ConfigError::WrongArity`] when `values` does not hold exactly
    /// four entries, or a range error from [`Self::new`].
    pub fn from_slice(kind: LocationClass, values: &[f64]) -> Result<Self, ConfigError> {
        match values {
            [hotel_count, country_hotel_count, expenditure, departure] => {
                Self::new(*hotel_count, *country_hotel_count, *expenditure, *departure)
            }
            _ => Err(ConfigError::WrongArity {
                kind: kind.into(),
                expected: Self::COEFFICIENTS.len(),
                found: values.len(),
            }),
        }
    }

    /// Coefficients in [`Self::COEFFICIENTS`] order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [
            self.hotel_count,
            self.country_hotel_count,
            self.expenditure,
            self.departure,
        ]
    }

    /// Check every coefficient lies in `0.0..=1.0`.
    ///
    /// # Errors
    /// Returns [`ConfigError::CoefficientOutOfRange`] naming the first bad
    /// coefficient.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in Self::COEFFICIENTS.into_iter().zip(self.to_array()) {
            check_coefficient(name, value)?;
        }
        Ok(())
    }
}

/// Coefficients for the six hotel factors.
///
/// The first two weight the parent city and area *scores*, not the hotel's
/// own hotel counts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct HotelWeights {
    /// Weight of the parent city's score.
    pub city_score: f64,
    /// Weight of the parent area's score.
    pub area_score: f64,
    /// Weight of the Agoda review percentile.
    pub agoda: f64,
    /// Weight of the Google review percentile.
    pub google: f64,
    /// Weight of the outbound expenditure score.
    pub expenditure: f64,
    /// Weight of the outbound departure score.
    pub departure: f64,
}

impl HotelWeights {
    /// Coefficient names in vector order.
    pub const COEFFICIENTS: [&'static str; 6] = [
        "city_score",
        "area_score",
        "agoda",
        "google",
        "expenditure",
        "departure",
    ];

    /// Build from a coefficient vector in [`Self::COEFFICIENTS`] order.
    ///
    /// # Errors
    /// Returns [`ConfigError::WrongArity`] when `values` does not hold exactly
    /// six entries, or [`ConfigError::CoefficientOutOfRange`].
    pub fn from_slice(values: &[f64]) -> Result<Self, ConfigError> {
        let [city_score, area_score, agoda, google, expenditure, departure] = values else {
            return Err(ConfigError::WrongArity {
                kind: DestinationKind::Hotel,
                expected: Self::COEFFICIENTS.len(),
                found: values.len(),
            });
        };
        let weights = Self {
            city_score: *city_score,
            area_score: *area_score,
            agoda: *agoda,
            google: *google,
            expenditure: *expenditure,
            departure: *departure,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Coefficients in [`Self::COEFFICIENTS`] order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 6] {
        [
            self.city_score,
            self.area_score,
            self.agoda,
            self.google,
            self.expenditure,
            self.departure,
        ]
    }

    /// Check every coefficient lies in `0.0..=1.0`.
    ///
    /// # Errors
    /// Returns [`ConfigError::CoefficientOutOfRange`] naming the first bad
    /// coefficient.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in Self::COEFFICIENTS.into_iter().zip(self.to_array()) {
            check_coefficient(name, value)?;
        }
        Ok(())
    }
}

/// Country identifier of the historical boost rule.
pub const THAILAND_COUNTRY_ID: u64 = 106;
/// Multiplier of the historical boost rule.
pub const THAILAND_BOOST: f64 = 3.0;

/// Named policy table of per-country location score multipliers.
///
/// Empty by default. A boost multiplies the score of every city and area in
/// the country, so hotels inherit it through their parent scores.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CountryBoosts(BTreeMap<u64, f64>);

impl CountryBoosts {
    /// Build a validated table.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBoost`] for a negative or non-finite
    /// multiplier.
    pub fn new(entries: BTreeMap<u64, f64>) -> Result<Self, ConfigError> {
        let boosts = Self(entries);
        boosts.validate()?;
        Ok(boosts)
    }

    /// The legacy "triple Thailand" rule, for operators who adopt it.
    #[must_use]
    pub fn historical_thailand() -> Self {
        Self(BTreeMap::from([(THAILAND_COUNTRY_ID, THAILAND_BOOST)]))
    }

    /// Multiplier for `country_id`, if one is configured.
    #[must_use]
    pub fn multiplier(&self, country_id: u64) -> Option<f64> {
        self.0.get(&country_id).copied()
    }

    /// Whether no boosts are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(country_id, multiplier)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.0.iter().map(|(id, multiplier)| (*id, *multiplier))
    }

    /// Check every multiplier is finite and non-negative.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBoost`] for the first bad entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self
            .iter()
            .find(|(_, multiplier)| !multiplier.is_finite() || multiplier.is_sign_negative())
        {
            Some((country_id, multiplier)) => Err(ConfigError::InvalidBoost {
                country_id,
                multiplier,
            }),
            None => Ok(()),
        }
    }
}

/// Weight sets, threshold and boosts used for one search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "repr::ScoringConfigRepr", into = "repr::ScoringConfigRepr")
)]
pub struct ScoringConfig {
    city: LocationWeights,
    small_city: LocationWeights,
    area: LocationWeights,
    small_area: LocationWeights,
    hotel: HotelWeights,
    threshold: SmallCityThreshold,
    boosts: CountryBoosts,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = |hotel_count, country_hotel_count, expenditure, departure| LocationWeights {
            hotel_count,
            country_hotel_count,
            expenditure,
            departure,
        };
        Self {
            city: weights(1.0, 0.1, 0.1, 0.1),
            small_city: weights(1.0, 0.0, 0.1, 0.1),
            area: weights(1.0, 0.1, 0.1, 0.1),
            small_area: weights(1.0, 0.0, 0.0, 0.0),
            hotel: HotelWeights::default(),
            threshold: SmallCityThreshold::default(),
            boosts: CountryBoosts::default(),
        }
    }
}

impl ScoringConfig {
    /// Build a config from explicit weight sets.
    ///
    /// # Errors
    /// Returns the first validation failure among the weight sets.
    pub fn new(
        locations: [LocationWeights; 4],
        hotel: HotelWeights,
        threshold: SmallCityThreshold,
    ) -> Result<Self, ConfigError> {
        let [city, small_city, area, small_area] = locations;
        let config = Self {
            city,
            small_city,
            area,
            small_area,
            hotel,
            threshold,
            boosts: CountryBoosts::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a config from a `kind → coefficient vector` map.
    ///
    /// Keys are the kind names `city`, `small_city`, `area`, `small_area`
    /// and `hotel`. Every kind is required; none is padded or guessed.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownKind`], [`ConfigError::MissingKind`],
    /// [`ConfigError::WrongArity`] or [`ConfigError::CoefficientOutOfRange`].
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    /// use wayfare_core::{ConfigError, DestinationKind, ScoringConfig, SmallCityThreshold};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("city".to_owned(), vec![1.0, 0.1, 0.1, 0.1]);
    /// let err = ScoringConfig::from_coefficient_map(&map, SmallCityThreshold::default())
    ///     .unwrap_err();
    /// assert_eq!(err, ConfigError::MissingKind { kind: DestinationKind::SmallCity });
    /// ```
    pub fn from_coefficient_map(
        map: &BTreeMap<String, Vec<f64>>,
        threshold: SmallCityThreshold,
    ) -> Result<Self, ConfigError> {
        if let Some(name) = map
            .keys()
            .find(|name| name.parse::<DestinationKind>().is_err())
        {
            return Err(ConfigError::UnknownKind { name: name.clone() });
        }
        let lookup = |kind: DestinationKind| {
            map.iter()
                .find(|(name, _)| name.parse::<DestinationKind>().ok() == Some(kind))
                .map(|(_, values)| values.as_slice())
                .ok_or(ConfigError::MissingKind { kind })
        };
        let location = |class: LocationClass| {
            lookup(class.into()).and_then(|values| LocationWeights::from_slice(class, values))
        };
        Self::new(
            [
                location(LocationClass::City)?,
                location(LocationClass::SmallCity)?,
                location(LocationClass::Area)?,
                location(LocationClass::SmallArea)?,
            ],
            HotelWeights::from_slice(lookup(DestinationKind::Hotel)?)?,
            threshold,
        )
    }

    /// Export weights as a `kind → coefficient vector` map.
    #[must_use]
    pub fn to_coefficient_map(&self) -> BTreeMap<String, Vec<f64>> {
        let mut map: BTreeMap<String, Vec<f64>> = LocationClass::ALL
            .into_iter()
            .map(|class| {
                (
                    DestinationKind::from(class).as_str().to_owned(),
                    self.location_weights(class).to_array().to_vec(),
                )
            })
            .collect();
        map.insert(
            DestinationKind::Hotel.as_str().to_owned(),
            self.hotel.to_array().to_vec(),
        );
        map
    }

    /// Weights for a classified city or area.
    #[must_use]
    pub const fn location_weights(&self, class: LocationClass) -> &LocationWeights {
        match class {
            LocationClass::City => &self.city,
            LocationClass::SmallCity => &self.small_city,
            LocationClass::Area => &self.area,
            LocationClass::SmallArea => &self.small_area,
        }
    }

    /// Weights for hotels.
    #[must_use]
    pub const fn hotel_weights(&self) -> &HotelWeights {
        &self.hotel
    }

    /// Small-city threshold.
    #[must_use]
    pub const fn threshold(&self) -> SmallCityThreshold {
        self.threshold
    }

    /// Country boost policy.
    #[must_use]
    pub const fn country_boosts(&self) -> &CountryBoosts {
        &self.boosts
    }

    /// Return a copy with one location weight set replaced.
    #[must_use]
    pub fn with_location_weights(&self, class: LocationClass, weights: LocationWeights) -> Self {
        let mut next = self.clone();
        match class {
            LocationClass::City => next.city = weights,
            LocationClass::SmallCity => next.small_city = weights,
            LocationClass::Area => next.area = weights,
            LocationClass::SmallArea => next.small_area = weights,
        }
        next
    }

    /// Return a copy with the hotel weights replaced.
    #[must_use]
    pub fn with_hotel_weights(&self, weights: HotelWeights) -> Self {
        Self {
            hotel: weights,
            ..self.clone()
        }
    }

    /// Return a copy with a new threshold.
    #[must_use]
    pub fn with_threshold(&self, threshold: SmallCityThreshold) -> Self {
        Self {
            threshold,
            ..self.clone()
        }
    }

    /// Return a copy with a new boost table.
    #[must_use]
    pub fn with_country_boosts(&self, boosts: CountryBoosts) -> Self {
        Self {
            boosts,
            ..self.clone()
        }
    }

    /// Validate every weight set and boost.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for class in LocationClass::ALL {
            self.location_weights(class).validate()?;
        }
        self.hotel.validate()?;
        self.boosts.validate()
    }
}

#[cfg(feature = "serde")]
mod repr {
    //! Serialized layout of [`ScoringConfig`].

    use super::{
        ConfigError, CountryBoosts, HotelWeights, LocationWeights, ScoringConfig,
        SmallCityThreshold,
    };

    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(super) struct WeightTableRepr {
        city: LocationWeights,
        small_city: LocationWeights,
        area: LocationWeights,
        small_area: LocationWeights,
        hotel: HotelWeights,
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(super) struct ScoringConfigRepr {
        weights: WeightTableRepr,
        small_city_threshold: SmallCityThreshold,
        #[serde(default)]
        country_boosts: CountryBoosts,
    }

    impl TryFrom<ScoringConfigRepr> for ScoringConfig {
        type Error = ConfigError;

        fn try_from(value: ScoringConfigRepr) -> Result<Self, Self::Error> {
            let weights = value.weights;
            let config = Self::new(
                [
                    weights.city,
                    weights.small_city,
                    weights.area,
                    weights.small_area,
                ],
                weights.hotel,
                value.small_city_threshold,
            )?;
            value.country_boosts.validate()?;
            Ok(config.with_country_boosts(value.country_boosts))
        }
    }

    impl From<ScoringConfig> for ScoringConfigRepr {
        fn from(value: ScoringConfig) -> Self {
            Self {
                weights: WeightTableRepr {
                    city: value.city,
                    small_city: value.small_city,
                    area: value.area,
                    small_area: value.small_area,
                    hotel: value.hotel,
                },
                small_city_threshold: value.threshold,
                country_boosts: value.boosts,
            }
        }
    }
}
