//! Glicko-2 rating updates, one player and one rating period at a time.
//!
//! ```
//! use glicko2_engine::{Game, Rating, RatingPeriod, RatingSystem, Score};
//!
//! let rating_system = RatingSystem::builder().tau(0.5).build();
//!
//! let period = RatingPeriod::new(
//!     Rating::new(1500.0, 200.0, 0.06),
//!     vec![
//!         Game::new(Rating::new(1400.0, 30.0, 0.06), Score::WIN),
//!         Game::new(Rating::new(1550.0, 100.0, 0.06), Score::LOSS),
//!         Game::new(Rating::new(1700.0, 300.0, 0.06), Score::LOSS),
//!     ],
//! );
//!
//! let updated = rating_system.update_rating(&period)?;
//! assert!((updated.rating.0 - 1464.06).abs() < 0.01);
//! # Ok::<_, glicko2_engine::UpdateError>(())
//! ```
//!
//! Updates are pure functions of the ratings at the start of the period, so
//! all players of a period can be updated independently and in parallel.

mod error;
mod internal_rating;
mod period;
mod rating;
mod rating_system;
mod score;
mod volatility;

pub use error::{InvalidInput, Participant, UpdateError};
pub use internal_rating::{
    expectation, g, InternalRating, INTERNAL_RATING_ORIGIN, INTERNAL_RATING_SCALE,
};
pub use period::{Game, RatingPeriod};
pub use rating::{Rating, RatingDifference, RatingScalar, Volatility};
pub use rating_system::{RatingSystem, RatingSystemBuilder};
pub use score::Score;

/// Log likelihood deviance metric that can be used to evaluate the quality of
/// rating system predictions.
///
/// Lower is better.
///
/// See <https://www.kaggle.com/c/ChessRatings2/overview/evaluation>.
pub fn deviance(Score(expected): Score, Score(actual): Score) -> f64 {
    let expected = expected.clamp(0.01, 0.99);
    -(actual * expected.log10() + (1.0 - actual) * (1.0 - expected).log10())
}
