use thiserror::Error;

/// Errors raised by the game engine
///
/// Episode endings (timeout, collision) are not errors; they are reported
/// through [`StepResult`](super::StepResult).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("no free cell left on the grid to place food")]
    NoFreeCell,

    #[error("episode has terminated; call reset() before stepping again")]
    EpisodeTerminated,
}
