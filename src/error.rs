use thiserror::Error;

/// Participant of a rating period that failed validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Participant {
    /// The player whose rating is being updated.
    Player,
    /// The opponent of the game at this index.
    Opponent(usize),
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Participant::Player => f.write_str("player"),
            Participant::Opponent(index) => write!(f, "opponent in game {index}"),
        }
    }
}

/// A rating period rejected before any computation.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("rating of {0} is not finite: {1}")]
    Rating(Participant, f64),
    #[error("deviation of {0} must be positive and finite: {1}")]
    Deviation(Participant, f64),
    #[error("volatility of {0} must be positive and finite: {1}")]
    Volatility(Participant, f64),
    #[error("score of game {0} is not a loss, draw or win: {1}")]
    Score(usize, f64),
}

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum UpdateError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// The volatility solver exceeded its iteration cap. Unreachable for
    /// valid inputs and a sane configuration.
    #[error("volatility did not converge within {iterations} iterations")]
    NumericalNonConvergence { iterations: u32 },
    #[error("non-finite value while computing {stage}")]
    NumericalInstability { stage: &'static str },
}
