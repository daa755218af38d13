use thiserror::Error;

/// Rejections produced by the game engine and the session registry.
///
/// None of these change any state; the caller decides how to present them.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// A game is already running in the target channel.
    #[error("a game is already running in this channel")]
    SessionAlreadyActive,
    /// No game is running in the target channel.
    #[error("there is no game running in this channel")]
    NoActiveSession,
    /// The actor is not the participant whose mark is to move.
    #[error("it is not your turn")]
    NotYourTurn,
    /// The target cell already holds a mark.
    #[error("that cell is already taken")]
    CellOccupied,
    /// The target cell index is outside 0..=8.
    #[error("cell {0} does not exist")]
    InvalidCell(usize),
    /// Only participants or the initiator may reset a game.
    #[error("only the players can reset this game")]
    ResetNotAuthorized,
    /// A game needs two distinct participants.
    #[error("you can't play against yourself")]
    SamePlayer,
}
