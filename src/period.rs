use crate::{rating::Rating, score::Score};

/// A game played during a rating period, from the point of view of the
/// player being rated.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    /// Rating of the opponent at the start of the period.
    pub opponent: Rating,
    /// Result for the player being rated.
    pub score: Score,
}

impl Game {
    pub fn new(opponent: Rating, score: Score) -> Game {
        Game { opponent, score }
    }
}

/// Input for a single player's update: the player's rating at the start of
/// the period and all games they played during it. The order of games does
/// not matter.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingPeriod {
    pub player: Rating,
    pub games: Vec<Game>,
}

impl RatingPeriod {
    pub fn new(player: Rating, games: Vec<Game>) -> RatingPeriod {
        RatingPeriod { player, games }
    }

    /// A period in which the player did not play.
    pub fn inactive(player: Rating) -> RatingPeriod {
        RatingPeriod::new(player, Vec::new())
    }

    pub fn add_game(&mut self, opponent: Rating, score: Score) -> &mut Self {
        self.games.push(Game::new(opponent, score));
        self
    }

    pub fn is_inactive(&self) -> bool {
        self.games.is_empty()
    }
}
