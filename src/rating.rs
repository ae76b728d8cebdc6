use std::ops::{Add, Mul, Sub};

use crate::internal_rating::InternalRating;

/// Number representing playing strength on the public Glicko scale, such
/// that the difference between two ratings can be used to predict an
/// expected score. Higher is better.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct RatingScalar(pub f64);

impl From<RatingScalar> for f64 {
    #[inline]
    fn from(RatingScalar(rating): RatingScalar) -> f64 {
        rating
    }
}

impl Sub<RatingScalar> for RatingScalar {
    type Output = RatingDifference;

    #[inline]
    fn sub(self, rhs: RatingScalar) -> RatingDifference {
        RatingDifference(self.0 - rhs.0)
    }
}

impl Add<RatingDifference> for RatingScalar {
    type Output = RatingScalar;

    #[inline]
    fn add(self, RatingDifference(difference): RatingDifference) -> RatingScalar {
        RatingScalar(self.0 + difference)
    }
}

impl Sub<RatingDifference> for RatingScalar {
    type Output = RatingScalar;

    #[inline]
    fn sub(self, RatingDifference(difference): RatingDifference) -> RatingScalar {
        RatingScalar(self.0 - difference)
    }
}

/// A difference between two ratings. Also used for the rating deviation.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct RatingDifference(pub f64);

impl From<RatingDifference> for f64 {
    #[inline]
    fn from(RatingDifference(difference): RatingDifference) -> f64 {
        difference
    }
}

impl RatingDifference {
    #[inline]
    pub fn abs(self) -> RatingDifference {
        RatingDifference(self.0.abs())
    }
}

impl Mul<RatingDifference> for f64 {
    type Output = RatingDifference;

    #[inline]
    fn mul(self, RatingDifference(difference): RatingDifference) -> RatingDifference {
        RatingDifference(self * difference)
    }
}

/// Number representing the degree of expected fluctuation in a rating.
/// Identical on the public and the internal scale.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Volatility(pub f64);

impl Volatility {
    #[inline]
    pub(crate) fn sq(self) -> f64 {
        self.0 * self.0
    }
}

impl From<Volatility> for f64 {
    #[inline]
    fn from(Volatility(volatility): Volatility) -> f64 {
        volatility
    }
}

/// A player's skill estimate at the start or the end of a rating period.
///
/// Ratings are values. An update never modifies its inputs, it produces a
/// new `Rating` for the next period.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    /// Number indicating playing strength. Higher is better. The difference
    /// between two ratings determines the expected score in a game between
    /// the two players.
    pub rating: RatingScalar,
    /// Uncertainty in the rating. A range from rating minus 1.96 times the
    /// deviation to rating plus 1.96 times the deviation approximately
    /// represents a 95% confidence interval.
    pub deviation: RatingDifference,
    /// Number indicating the degree of expected fluctuation in the rating.
    pub volatility: Volatility,
}

impl Rating {
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Rating {
        Rating {
            rating: RatingScalar(rating),
            deviation: RatingDifference(deviation),
            volatility: Volatility(volatility),
        }
    }

    /// Converts to the zero-centered Glicko-2 scale.
    #[inline]
    pub fn to_internal(&self) -> InternalRating {
        InternalRating::from(self)
    }

    /// Approximate 95% confidence interval around the rating.
    pub fn confidence_interval(&self) -> (RatingScalar, RatingScalar) {
        let margin = 1.96 * self.deviation.abs();
        (self.rating - margin, self.rating + margin)
    }
}
