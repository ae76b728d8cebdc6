use std::str::FromStr;

use glicko2_engine::Score;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use thiserror::Error;

/// One CSV row: `period,player,opponent,result`.
#[serde_as]
#[derive(Deserialize, Debug)]
pub struct RawEncounter {
    pub period: u32,
    pub player: String,
    pub opponent: String,
    #[serde_as(as = "DisplayFromStr")]
    pub result: GameResult,
}

/// Result of a game for the first named player.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GameResult {
    Win,
    Draw,
    Loss,
}

#[derive(Debug, Error)]
#[error("invalid game result")]
pub struct InvalidGameResult;

impl FromStr for GameResult {
    type Err = InvalidGameResult;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "1" | "1-0" => GameResult::Win,
            "0" | "0-1" => GameResult::Loss,
            "0.5" | "1/2" | "1/2-1/2" => GameResult::Draw,
            _ => return Err(InvalidGameResult),
        })
    }
}

impl GameResult {
    pub fn score(self) -> Score {
        match self {
            GameResult::Win => Score::WIN,
            GameResult::Draw => Score::DRAW,
            GameResult::Loss => Score::LOSS,
        }
    }
}
