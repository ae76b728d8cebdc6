use tracing::{debug, warn};

use crate::{
    error::{InvalidInput, Participant, UpdateError},
    internal_rating::{g, InternalRating, INTERNAL_RATING_SCALE},
    period::RatingPeriod,
    rating::{Rating, RatingDifference, RatingScalar, Volatility},
    score::Score,
    volatility::{ensure_finite, Solver, VolatilityProblem},
};

#[derive(Debug, Clone)]
pub struct RatingSystemBuilder {
    default_rating: f64,
    default_deviation: f64,
    default_volatility: f64,

    tau: f64,

    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Default for RatingSystemBuilder {
    fn default() -> RatingSystemBuilder {
        RatingSystemBuilder::new()
    }
}

impl RatingSystemBuilder {
    pub fn new() -> RatingSystemBuilder {
        RatingSystemBuilder {
            default_rating: 1500.0,
            default_deviation: 350.0,
            default_volatility: 0.06,

            tau: 0.5,

            convergence_tolerance: 0.000_001,
            max_iterations: 100,
        }
    }

    pub fn default_rating(&mut self, default_rating: f64) -> &mut Self {
        assert!(default_rating.is_finite());
        self.default_rating = default_rating;
        self
    }

    pub fn default_deviation(&mut self, default_deviation: f64) -> &mut Self {
        assert!(default_deviation > 0.0 && default_deviation.is_finite());
        self.default_deviation = default_deviation;
        self
    }

    pub fn default_volatility(&mut self, default_volatility: f64) -> &mut Self {
        assert!(default_volatility > 0.0 && default_volatility.is_finite());
        self.default_volatility = default_volatility;
        self
    }

    /// System constant constraining the change in volatility over time.
    /// Reasonable choices are between `0.3` and `1.2`. Smaller values trust
    /// the prior volatility more.
    pub fn tau(&mut self, tau: f64) -> &mut Self {
        assert!(tau > 0.0 && tau.is_finite());
        self.tau = tau;
        self
    }

    pub fn convergence_tolerance(&mut self, convergence_tolerance: f64) -> &mut Self {
        assert!(convergence_tolerance > 0.0);
        self.convergence_tolerance = convergence_tolerance;
        self
    }

    pub fn max_iterations(&mut self, max_iterations: u32) -> &mut Self {
        assert!(max_iterations > 0);
        self.max_iterations = max_iterations;
        self
    }

    pub fn build(&self) -> RatingSystem {
        RatingSystem {
            default_rating: self.default_rating,
            default_deviation: self.default_deviation,
            default_volatility: self.default_volatility,

            tau: self.tau,

            convergence_tolerance: self.convergence_tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// Parameters of a Glicko-2 rating system.
///
/// They should be chosen once and kept for the lifetime of the system, so
/// that ratings from different periods remain comparable.
#[derive(Debug, Copy, Clone)]
pub struct RatingSystem {
    default_rating: f64,
    default_deviation: f64,
    default_volatility: f64,

    tau: f64,

    convergence_tolerance: f64,
    max_iterations: u32,
}

impl Default for RatingSystem {
    fn default() -> RatingSystem {
        RatingSystem::new()
    }
}

impl RatingSystem {
    pub fn builder() -> RatingSystemBuilder {
        RatingSystemBuilder::default()
    }

    pub fn new() -> RatingSystem {
        RatingSystem::builder().build()
    }

    pub fn default_rating(&self) -> f64 {
        self.default_rating
    }

    pub fn default_deviation(&self) -> f64 {
        self.default_deviation
    }

    pub fn default_volatility(&self) -> f64 {
        self.default_volatility
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn convergence_tolerance(&self) -> f64 {
        self.convergence_tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Rating for a player who has not played yet.
    pub fn new_rating(&self) -> Rating {
        Rating {
            rating: RatingScalar(self.default_rating),
            deviation: RatingDifference(self.default_deviation),
            volatility: Volatility(self.default_volatility),
        }
    }

    /// Predicted score of `first` in a game against `second`, taking the
    /// uncertainty of both ratings into account.
    pub fn expected_score(&self, first: &Rating, second: &Rating) -> Score {
        let first = first.to_internal();
        let second = second.to_internal();
        let phi = f64::hypot(first.phi, second.phi);
        Score(1.0 / (1.0 + (-g(phi) * (first.mu - second.mu)).exp()))
    }

    /// Computes the player's rating after the given rating period.
    ///
    /// Ratings of all participants are taken as they were at the start of
    /// the period. If the player did not play, only the deviation grows.
    pub fn update_rating(&self, period: &RatingPeriod) -> Result<Rating, UpdateError> {
        validate(period)?;

        let player = period.player.to_internal();
        let phi_sq = player.phi * player.phi;

        let Some(estimate) = Estimate::aggregate(&player, period)? else {
            let phi = (phi_sq + player.volatility.sq()).sqrt();
            return ensure_valid(Rating {
                deviation: RatingDifference(phi * INTERNAL_RATING_SCALE),
                ..period.player.clone()
            });
        };

        let volatility = self.solver().solve(&VolatilityProblem {
            phi_sq,
            variance: estimate.variance,
            delta: estimate.delta(),
            volatility: player.volatility,
        })?;

        let phi_star_sq = phi_sq + volatility.sq();
        let phi = ensure_finite(
            1.0 / (1.0 / phi_star_sq + 1.0 / estimate.variance).sqrt(),
            "deviation",
        )?;
        let mu = ensure_finite(player.mu + phi * phi * estimate.improvement, "rating")?;

        debug!(
            games = period.games.len(),
            variance = estimate.variance,
            delta = estimate.delta(),
            volatility = volatility.0,
            "rating updated"
        );

        ensure_valid(InternalRating { mu, phi, volatility }.to_public())
    }

    fn solver(&self) -> Solver {
        Solver {
            tau: self.tau,
            tolerance: self.convergence_tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// Summary of all games in a period.
#[derive(Debug, Copy, Clone)]
struct Estimate {
    /// Estimated variance `v` of the player's rating.
    variance: f64,
    /// Sum of `g(φ_j) (s_j − E_j)` over all games.
    improvement: f64,
}

impl Estimate {
    fn aggregate(
        player: &InternalRating,
        period: &RatingPeriod,
    ) -> Result<Option<Estimate>, UpdateError> {
        if period.is_inactive() {
            return Ok(None);
        }

        let mut information = 0.0;
        let mut improvement = 0.0;
        for game in &period.games {
            let opponent = game.opponent.to_internal();
            let weight = opponent.weight();
            let expected = opponent.expected_score_of(player.mu);
            information += weight * weight * expected * (1.0 - expected);
            improvement += weight * (game.score.value() - expected);
        }

        Ok(Some(Estimate {
            variance: ensure_finite(1.0 / information, "variance")?,
            improvement: ensure_finite(improvement, "improvement")?,
        }))
    }

    fn delta(&self) -> f64 {
        self.variance * self.improvement
    }
}

/// Final check on every computed rating: finite, with strictly positive
/// deviation and volatility.
fn ensure_valid(rating: Rating) -> Result<Rating, UpdateError> {
    ensure_finite(rating.rating.0, "rating")?;
    ensure_positive(ensure_finite(rating.deviation.0, "deviation")?, "deviation")?;
    ensure_positive(ensure_finite(rating.volatility.0, "volatility")?, "volatility")?;
    Ok(rating)
}

fn ensure_positive(value: f64, stage: &'static str) -> Result<f64, UpdateError> {
    if value > 0.0 {
        Ok(value)
    } else {
        warn!(stage, value, "non-positive value in rating update");
        Err(UpdateError::NumericalInstability { stage })
    }
}

fn validate(period: &RatingPeriod) -> Result<(), InvalidInput> {
    validate_rating(&period.player, Participant::Player)?;
    for (index, game) in period.games.iter().enumerate() {
        validate_rating(&game.opponent, Participant::Opponent(index))?;
        if !game.score.is_outcome() {
            return Err(InvalidInput::Score(index, game.score.value()));
        }
    }
    Ok(())
}

fn validate_rating(rating: &Rating, participant: Participant) -> Result<(), InvalidInput> {
    let RatingScalar(value) = rating.rating;
    if !value.is_finite() {
        return Err(InvalidInput::Rating(participant, value));
    }
    let RatingDifference(deviation) = rating.deviation;
    if !(deviation > 0.0 && deviation.is_finite()) {
        return Err(InvalidInput::Deviation(participant, deviation));
    }
    let Volatility(volatility) = rating.volatility;
    if !(volatility > 0.0 && volatility.is_finite()) {
        return Err(InvalidInput::Volatility(participant, volatility));
    }
    Ok(())
}
