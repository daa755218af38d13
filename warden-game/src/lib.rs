/// Grid, marks and line detection.
pub mod board;
/// Engine rejections.
pub mod error;
/// Per-channel registry of running games.
pub mod registry;
/// A single game between two participants.
pub mod session;

pub use board::{Board, CELL_COUNT, Mark};
pub use error::GameError;
pub use registry::{ChannelKey, GameRegistry, MoveDescriptor};
pub use session::{GameSession, GameStatus, ParticipantId};
