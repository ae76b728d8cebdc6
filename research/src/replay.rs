use glicko2_engine::{deviance, Rating, RatingPeriod, RatingSystem, Score, UpdateError};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    encounter::RawEncounter,
    player::{ByPlayerId, PlayerId, PlayerIds},
};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("period {found} after period {current}, encounters must be sorted by period")]
    OutOfOrder { current: u32, found: u32 },
}

#[derive(Debug, Copy, Clone)]
struct Encounter {
    player: PlayerId,
    opponent: PlayerId,
    score: Score,
}

#[derive(Debug, Default)]
pub struct Stats {
    pub periods: u64,
    pub games: u64,
    pub failed_updates: u64,
    total_deviance: f64,
}

impl Stats {
    fn record(&mut self, expected: Score, actual: Score) {
        self.games += 1;
        self.total_deviance += deviance(expected, actual);
    }

    /// Mean deviance of predictions made with ratings from before each game's
    /// period.
    pub fn mean_deviance(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_deviance / self.games as f64
    }
}

/// Replays encounters period by period. Within a period, every known player
/// is updated from the ratings at the start of the period.
pub struct Replay {
    rating_system: RatingSystem,
    players: PlayerIds,
    ratings: ByPlayerId<Rating>,
    current_period: Option<u32>,
    pending: Vec<Encounter>,
    stats: Stats,
}

impl Replay {
    pub fn new(rating_system: RatingSystem) -> Replay {
        Replay {
            rating_system,
            players: PlayerIds::default(),
            ratings: ByPlayerId::default(),
            current_period: None,
            pending: Vec::new(),
            stats: Stats::default(),
        }
    }

    pub fn push(&mut self, encounter: RawEncounter) -> Result<(), ReplayError> {
        match self.current_period {
            Some(current) if encounter.period < current => {
                return Err(ReplayError::OutOfOrder {
                    current,
                    found: encounter.period,
                });
            }
            Some(current) if encounter.period > current => self.close_period(current),
            _ => (),
        }
        self.current_period = Some(encounter.period);

        if encounter.player == encounter.opponent {
            warn!(player = %encounter.player, "skipping game against self");
            return Ok(());
        }

        let player = self.players.get_or_insert(encounter.player);
        let opponent = self.players.get_or_insert(encounter.opponent);
        self.pending.push(Encounter {
            player,
            opponent,
            score: encounter.result.score(),
        });
        Ok(())
    }

    pub fn finish(&mut self) {
        if let Some(current) = self.current_period.take() {
            self.close_period(current);
        }
    }

    pub fn rating(&self, player: PlayerId) -> Rating {
        self.ratings
            .get(player)
            .cloned()
            .unwrap_or_else(|| self.rating_system.new_rating())
    }

    pub fn players(&self) -> &PlayerIds {
        &self.players
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn close_period(&mut self, period: u32) {
        let mut periods: Vec<RatingPeriod> = self
            .players
            .iter()
            .map(|player| RatingPeriod::inactive(self.rating(player)))
            .collect();

        for encounter in std::mem::take(&mut self.pending) {
            let player = self.rating(encounter.player);
            let opponent = self.rating(encounter.opponent);
            self.stats.record(
                self.rating_system.expected_score(&player, &opponent),
                encounter.score,
            );
            periods[encounter.player.index()].add_game(opponent, encounter.score);
            periods[encounter.opponent.index()].add_game(player, encounter.score.opposite());
        }

        let rating_system = self.rating_system;
        let updated: Vec<Result<Rating, UpdateError>> = periods
            .par_iter()
            .map(|rating_period| rating_system.update_rating(rating_period))
            .collect();

        for (player, result) in self.players.iter().zip(updated) {
            match result {
                Ok(rating) => self.ratings.set(player, rating),
                Err(err) => {
                    warn!(player = self.players.name(player), period, %err, "keeping prior rating");
                    self.stats.failed_updates += 1;
                }
            }
        }

        self.stats.periods += 1;
        debug!(period, players = self.players.len(), "closed rating period");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::GameResult;

    fn encounter(period: u32, player: &str, opponent: &str, result: GameResult) -> RawEncounter {
        RawEncounter {
            period,
            player: player.to_owned(),
            opponent: opponent.to_owned(),
            result,
        }
    }

    #[test]
    fn test_replay() {
        let mut replay = Replay::new(RatingSystem::new());
        replay.push(encounter(1, "alice", "bob", GameResult::Win)).unwrap();
        replay.push(encounter(1, "alice", "carol", GameResult::Draw)).unwrap();
        replay.push(encounter(2, "carol", "bob", GameResult::Loss)).unwrap();
        replay.finish();

        let alice = replay.players().get("alice").unwrap();
        let bob = replay.players().get("bob").unwrap();
        let carol = replay.players().get("carol").unwrap();

        let stats = replay.stats();
        assert_eq!(stats.periods, 2);
        assert_eq!(stats.games, 3);
        assert_eq!(stats.failed_updates, 0);
        assert!(stats.mean_deviance() > 0.0);

        // Alice sat out period 2, so only her deviation moved.
        assert!(replay.rating(alice).rating.0 > 1500.0);
        assert!(replay.rating(bob).rating.0 < replay.rating(alice).rating.0);
        assert!(replay.rating(carol).rating.0 < 1500.0);
    }

    #[test]
    fn test_out_of_order() {
        let mut replay = Replay::new(RatingSystem::new());
        replay.push(encounter(5, "alice", "bob", GameResult::Win)).unwrap();
        assert!(matches!(
            replay.push(encounter(4, "alice", "bob", GameResult::Win)),
            Err(ReplayError::OutOfOrder {
                current: 5,
                found: 4
            })
        ));
    }
}
