//! Normalized factor values attached to destinations.
//!
//! Every factor is a percentile-like value in `0.0..=100.0`. A missing datum
//! is represented as `0.0`; stores never hand back "unknown".

/// Upper bound of any normalized factor.
pub const MAX_FACTOR: f64 = 100.0;

/// Clamp a factor into `0.0..=MAX_FACTOR`, mapping non-finite input to zero.
///
/// # Examples
/// ```
/// use wayfare_core::sanitise_factor;
///
/// assert_eq!(sanitise_factor(f64::NAN), 0.0);
/// assert_eq!(sanitise_factor(140.0), 100.0);
/// assert_eq!(sanitise_factor(42.0), 42.0);
/// ```
#[must_use]
pub const fn sanitise_factor(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_FACTOR)
    } else {
        0.0
    }
}

/// The four factors shared by cities and areas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationFactors {
    /// Hotel count relative to the largest city overall.
    pub hotel_count: f64,
    /// Hotel count relative to the largest city in the same country.
    pub country_hotel_count: f64,
    /// Outbound tourism expenditure score of the country.
    pub expenditure: f64,
    /// Outbound tourism departure score of the country.
    pub departure: f64,
}

impl LocationFactors {
    /// Return a copy with every value clamped into range.
    #[must_use]
    pub const fn sanitised(self) -> Self {
        Self {
            hotel_count: sanitise_factor(self.hotel_count),
            country_hotel_count: sanitise_factor(self.country_hotel_count),
            expenditure: sanitise_factor(self.expenditure),
            departure: sanitise_factor(self.departure),
        }
    }
}

/// A hotel's own factors. Hotels never use hotel-count factors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HotelFactors {
    /// Agoda review score relative to the best Agoda score.
    pub agoda: f64,
    /// Google review score relative to the best Google score.
    pub google: f64,
    /// Outbound tourism expenditure score of the hotel's country.
    pub expenditure: f64,
    /// Outbound tourism departure score of the hotel's country.
    pub departure: f64,
}

impl HotelFactors {
    /// Return a copy with every value clamped into range.
    #[must_use]
    pub const fn sanitised(self) -> Self {
        Self {
            agoda: sanitise_factor(self.agoda),
            google: sanitise_factor(self.google),
            expenditure: sanitise_factor(self.expenditure),
            departure: sanitise_factor(self.departure),
        }
    }
}

/// Factors of any destination, tagged by shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "snake_case"))]
pub enum FactorBag {
    /// City or area factors.
    Location(LocationFactors),
    /// Hotel factors.
    Hotel(HotelFactors),
}
