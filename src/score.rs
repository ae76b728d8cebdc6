/// A score or expectation value in the range `0.0..=1.0`, where `0.0` is a
/// loss and `1.0` is a win.
///
/// Game results fed into a rating period must be exactly one of
/// [`Score::LOSS`], [`Score::DRAW`] or [`Score::WIN`]. Predictions may take
/// any value in between.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Score(pub f64);

impl From<Score> for f64 {
    fn from(Score(score): Score) -> f64 {
        score
    }
}

impl Score {
    pub const LOSS: Score = Score(0.0);
    pub const DRAW: Score = Score(0.5);
    pub const WIN: Score = Score(1.0);

    pub fn opposite(self) -> Score {
        Score(1.0 - self.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this is a game outcome: loss, draw or win.
    pub fn is_outcome(self) -> bool {
        self == Score::LOSS || self == Score::DRAW || self == Score::WIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes() {
        assert!(Score::LOSS.is_outcome());
        assert!(Score::DRAW.is_outcome());
        assert!(Score::WIN.is_outcome());
        assert!(!Score(0.25).is_outcome());
        assert!(!Score(f64::NAN).is_outcome());
        assert!(!Score(-1.0).is_outcome());
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Score::WIN.opposite(), Score::LOSS);
        assert_eq!(Score::DRAW.opposite(), Score::DRAW);
    }
}
