use thiserror::Error;

/// Construction-time failures of the combination model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("a combination needs at least one step")]
    EmptyCombination,
    #[error("rotation count {0} is outside 1..=9")]
    CountOutOfRange(u8),
}
