//! Error types for the room layer.

use dicehall_protocol::{PlayerId, RoomId, ScoreCategory};

use crate::RoomState;

/// Errors from room management. These are returned to the caller, which
/// logs them and drops the triggering request.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (or was destroyed).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A room with this id already exists.
    #[error("room {0} already exists")]
    DuplicateRoom(RoomId),

    /// No more player slots available.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The player is already in this room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player is not in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The room is in a state that doesn't allow this operation.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),
}

/// Reasons a gameplay action is ignored.
///
/// These never reach the client. The coordinator logs them and the action
/// becomes a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Gameplay actions need a running game.
    #[error("game is not active (room is {0})")]
    NotActive(RoomState),

    /// Only the current player may act.
    #[error("player {0} is not the current player")]
    NotCurrentPlayer(PlayerId),

    /// The per-turn roll cap is used up.
    #[error("roll limit of {0} reached for this turn")]
    RollLimitReached(u8),

    /// Scoring needs at least one roll this turn.
    #[error("dice have not been rolled this turn")]
    NoDiceRolled,

    /// The category was scored earlier in the game.
    #[error("category {0} is already filled")]
    CategoryFilled(ScoreCategory),
}
