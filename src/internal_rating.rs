use std::f64::consts::PI;

use crate::rating::{Rating, RatingDifference, RatingScalar, Volatility};

/// Ratio between the public Glicko scale and the internal Glicko-2 scale.
pub const INTERNAL_RATING_SCALE: f64 = 173.7178;

/// Public rating that maps to `0.0` on the internal scale.
pub const INTERNAL_RATING_ORIGIN: f64 = 1500.0;

/// A rating on the zero-centered Glicko-2 scale, where the estimation math
/// is well-behaved.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InternalRating {
    /// Rating `μ`.
    pub mu: f64,
    /// Deviation `φ`.
    pub phi: f64,
    /// Volatility `σ`, same as on the public scale.
    pub volatility: Volatility,
}

impl From<&Rating> for InternalRating {
    fn from(rating: &Rating) -> InternalRating {
        InternalRating {
            mu: (f64::from(rating.rating) - INTERNAL_RATING_ORIGIN) / INTERNAL_RATING_SCALE,
            phi: f64::from(rating.deviation) / INTERNAL_RATING_SCALE,
            volatility: rating.volatility,
        }
    }
}

impl From<InternalRating> for Rating {
    fn from(internal: InternalRating) -> Rating {
        Rating {
            rating: RatingScalar(internal.mu * INTERNAL_RATING_SCALE + INTERNAL_RATING_ORIGIN),
            deviation: RatingDifference(internal.phi * INTERNAL_RATING_SCALE),
            volatility: internal.volatility,
        }
    }
}

impl InternalRating {
    /// Converts back to the public Glicko scale.
    #[inline]
    pub fn to_public(self) -> Rating {
        Rating::from(self)
    }

    /// Weight of a game against this opponent, [`g`] of its deviation.
    #[inline]
    pub fn weight(&self) -> f64 {
        g(self.phi)
    }

    /// Expected score `E` of a player with rating `mu` against this opponent.
    #[inline]
    pub fn expected_score_of(&self, mu: f64) -> f64 {
        expectation(mu, self.mu, self.phi)
    }
}

/// Down-weighting factor for an opponent with deviation `phi`. Opponents
/// with uncertain ratings contribute less.
#[inline]
pub fn g(phi: f64) -> f64 {
    1.0 / (1.0 + 3.0 * phi * phi / (PI * PI)).sqrt()
}

/// Expected score of a player with rating `mu` against an opponent with
/// rating `mu_j` and deviation `phi_j`, in `(0, 1)`.
#[inline]
pub fn expectation(mu: f64, mu_j: f64, phi_j: f64) -> f64 {
    1.0 / (1.0 + (-g(phi_j) * (mu - mu_j)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_round_trip() {
        for (rating, deviation) in [(1500.0, 350.0), (2831.5, 45.25), (-120.0, 0.001)] {
            let original = Rating::new(rating, deviation, 0.06);
            let back = original.to_internal().to_public();
            assert!((f64::from(back.rating) - rating).abs() < 1e-9);
            assert!((f64::from(back.deviation) - deviation).abs() < 1e-9);
            assert_eq!(back.volatility, original.volatility);
        }
    }

    #[test]
    fn test_default_rating_is_origin() {
        let internal = Rating::new(1500.0, 200.0, 0.06).to_internal();
        assert_eq!(internal.mu, 0.0);
        assert!((internal.phi - 1.1513).abs() < 1e-4);
    }

    #[test]
    fn test_glickman_contributions() {
        // Opponents from the example in Glickman's Glicko-2 paper.
        let opponents = [
            (Rating::new(1400.0, 30.0, 0.06), 0.9955, 0.639),
            (Rating::new(1550.0, 100.0, 0.06), 0.9531, 0.432),
            (Rating::new(1700.0, 300.0, 0.06), 0.7242, 0.303),
        ];
        for (opponent, expected_g, expected_e) in opponents {
            let opponent = opponent.to_internal();
            assert!((opponent.weight() - expected_g).abs() < 1e-4);
            assert!((opponent.expected_score_of(0.0) - expected_e).abs() < 1e-3);
        }
    }

    #[test]
    fn test_expectation_symmetric() {
        assert!((expectation(0.7, 0.7, 1.2) - 0.5).abs() < 1e-12);
        let e = expectation(0.3, -0.4, 0.5);
        assert!((e + expectation(-0.4, 0.3, 0.5) - 1.0).abs() < 1e-12);
    }
}
