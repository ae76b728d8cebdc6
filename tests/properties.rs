use glicko2_engine::{expectation, Game, Rating, RatingPeriod, RatingSystem, Score, UpdateError};
use proptest::prelude::*;

fn rating() -> impl Strategy<Value = Rating> {
    (1000.0f64..2000.0, 30.0f64..350.0, 0.03f64..0.1)
        .prop_map(|(rating, deviation, volatility)| Rating::new(rating, deviation, volatility))
}

/// Ratings with deviation and volatility spread log-uniformly down to the
/// underflow boundary.
fn extreme_rating() -> impl Strategy<Value = Rating> {
    (0.0f64..3000.0, -300.0f64..4.0, -300.0f64..1.0).prop_map(|(rating, deviation, volatility)| {
        Rating::new(rating, 10f64.powf(deviation), 10f64.powf(volatility))
    })
}

fn outcome() -> impl Strategy<Value = Score> {
    prop_oneof![Just(Score::LOSS), Just(Score::DRAW), Just(Score::WIN)]
}

fn rating_systems() -> impl Strategy<Value = RatingSystem> {
    (0.3f64..1.2).prop_map(|tau| RatingSystem::builder().tau(tau).build())
}

proptest! {
    #[test]
    fn prop_inactive_keeps_rating(
        player in rating(),
        rating_system in rating_systems(),
    ) {
        let updated = rating_system.update_rating(&RatingPeriod::inactive(player.clone())).unwrap();
        prop_assert_eq!(updated.rating, player.rating);
        prop_assert!(updated.deviation >= player.deviation);
        prop_assert_eq!(updated.volatility, player.volatility);
    }

    #[test]
    fn prop_scale_round_trip(
        rating in -5000.0f64..8000.0,
        deviation in 0.01f64..1000.0,
        volatility in 0.001f64..1.0,
    ) {
        let original = Rating::new(rating, deviation, volatility);
        let back = original.to_internal().to_public();
        prop_assert!((back.rating.0 - rating).abs() < 1e-9);
        prop_assert!((back.deviation.0 - deviation).abs() < 1e-9);
        prop_assert_eq!(back.volatility, original.volatility);
    }

    #[test]
    fn prop_equal_players_expect_draw(player in rating()) {
        let internal = player.to_internal();
        prop_assert!((expectation(internal.mu, internal.mu, internal.phi) - 0.5).abs() < 1e-12);
        let rating_system = RatingSystem::new();
        let expected = rating_system.expected_score(&player, &player.clone());
        prop_assert!((expected.value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn prop_win_not_worse_than_loss(
        player in rating(),
        opponent in rating(),
        rating_system in rating_systems(),
    ) {
        let mut won = RatingPeriod::inactive(player.clone());
        won.add_game(opponent.clone(), Score::WIN);
        let mut drew = RatingPeriod::inactive(player.clone());
        drew.add_game(opponent.clone(), Score::DRAW);
        let mut lost = RatingPeriod::inactive(player);
        lost.add_game(opponent, Score::LOSS);

        let won = rating_system.update_rating(&won).unwrap();
        let drew = rating_system.update_rating(&drew).unwrap();
        let lost = rating_system.update_rating(&lost).unwrap();
        prop_assert!(won.rating >= drew.rating);
        prop_assert!(drew.rating >= lost.rating);
    }

    #[test]
    fn prop_confidence_never_inverts(
        player in rating(),
        games in prop::collection::vec((rating(), outcome()), 0..8),
        rating_system in rating_systems(),
    ) {
        let period = RatingPeriod::new(
            player,
            games.into_iter().map(|(opponent, score)| Game::new(opponent, score)).collect(),
        );
        let updated = rating_system.update_rating(&period).unwrap();
        prop_assert!(updated.rating.0.is_finite());
        prop_assert!(updated.deviation.0 > 0.0 && updated.deviation.0.is_finite());
        prop_assert!(updated.volatility.0 > 0.0 && updated.volatility.0.is_finite());
    }

    #[test]
    fn prop_games_shrink_deviation(
        player in rating(),
        games in prop::collection::vec((rating(), outcome()), 1..8),
        rating_system in rating_systems(),
    ) {
        let inactive = rating_system.update_rating(&RatingPeriod::inactive(player.clone())).unwrap();
        let period = RatingPeriod::new(
            player,
            games.into_iter().map(|(opponent, score)| Game::new(opponent, score)).collect(),
        );
        let active = rating_system.update_rating(&period).unwrap();
        // Playing adds information, unless volatility jumped.
        if active.volatility <= inactive.volatility {
            prop_assert!(active.deviation < inactive.deviation);
        }
    }

    #[test]
    fn prop_extreme_inputs_never_yield_invalid_rating(
        player in extreme_rating(),
        games in prop::collection::vec((extreme_rating(), outcome()), 0..4),
        rating_system in rating_systems(),
    ) {
        let period = RatingPeriod::new(
            player,
            games.into_iter().map(|(opponent, score)| Game::new(opponent, score)).collect(),
        );
        match rating_system.update_rating(&period) {
            Ok(updated) => {
                prop_assert!(updated.rating.0.is_finite());
                prop_assert!(updated.deviation.0 > 0.0 && updated.deviation.0.is_finite());
                prop_assert!(updated.volatility.0 > 0.0 && updated.volatility.0.is_finite());
            }
            Err(UpdateError::NumericalInstability { .. })
            | Err(UpdateError::NumericalNonConvergence { .. }) => (),
            Err(err) => prop_assert!(false, "unexpected error: {}", err),
        }
    }
}
