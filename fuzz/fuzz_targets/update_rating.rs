#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use glicko2_engine::{Game, Rating, RatingPeriod, RatingSystem, Score};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ArbitraryRating {
    rating: f64,
    deviation: f64,
    volatility: f64,
}

impl ArbitraryRating {
    fn into_rating(self) -> Rating {
        Rating::new(self.rating, self.deviation, self.volatility)
    }
}

#[derive(Arbitrary, Debug)]
struct ArbitraryPeriod {
    tau: f64,
    player: ArbitraryRating,
    games: Vec<(ArbitraryRating, u8)>,
}

fn assert_rating(rating: &Rating) {
    assert!(rating.rating.0.is_finite());
    assert!(rating.deviation.0.is_finite() && rating.deviation.0 > 0.0);
    assert!(rating.volatility.0.is_finite() && rating.volatility.0 > 0.0);
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(period) = ArbitraryPeriod::arbitrary(&mut u) else {
        return;
    };
    if !(period.tau > 0.0 && period.tau.is_finite()) {
        return;
    }

    let rating_system = RatingSystem::builder().tau(period.tau).build();

    let games = period
        .games
        .into_iter()
        .map(|(opponent, score)| {
            let score = match score % 4 {
                0 => Score::LOSS,
                1 => Score::DRAW,
                2 => Score::WIN,
                _ => Score(f64::from(score) / 255.0),
            };
            Game::new(opponent.into_rating(), score)
        })
        .collect();
    let period = RatingPeriod::new(period.player.into_rating(), games);

    // Either an error or a valid rating, never garbage.
    if let Ok(updated) = rating_system.update_rating(&period) {
        assert_rating(&updated);
    }
});
