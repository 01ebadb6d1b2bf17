//! The message contract between players and the server.
//!
//! One enum covers both directions. Serialized with an internal `type` tag,
//! so a roll request looks like:
//!
//! ```json
//! { "type": "RollDice", "room_id": "9f3c…" }
//! ```

use serde::{Deserialize, Serialize};

use crate::{Dice, PlayerInfo, RoomId, ScoreCategory};

/// Every message that can travel between a player and the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    // -- Client → server: room management ---------------------------------
    /// Create a new room and join it.
    CreateRoom,

    /// Join an existing room.
    JoinRoom { room_id: RoomId },

    /// Ask for the ids of all rooms.
    ListRooms,

    /// Leave a room.
    LeaveRoom { room_id: RoomId },

    // -- Client → server: gameplay ------------------------------------------
    /// Begin the sender's turn.
    StartTurn { room_id: RoomId },

    /// Roll every die that isn't held.
    RollDice { room_id: RoomId },

    /// Reroll after choosing which dice to hold. Only the `held` flags of
    /// `dice` are read; face values are ignored.
    RerollDice { room_id: RoomId, dice: Dice },

    /// Score the current dice into `category` and pass the turn.
    ChooseCategory {
        room_id: RoomId,
        category: ScoreCategory,
    },

    // -- Server → client ------------------------------------------------------
    /// Identity assigned to a new connection.
    ServerJoin { player: PlayerInfo },

    /// Sent to the creator of a room.
    RoomCreated { room_id: RoomId, player: PlayerInfo },

    /// Sent to the player who just joined.
    RoomJoined { room_id: RoomId, player: PlayerInfo },

    /// Sent to the other members when someone joins.
    PlayerJoinedRoom { room_id: RoomId, player: PlayerInfo },

    /// Sent to the player who just left.
    RoomLeft { room_id: RoomId, player: PlayerInfo },

    /// Sent to the remaining members when someone leaves.
    PlayerLeftRoom { room_id: RoomId, player: PlayerInfo },

    /// The game in `room_id` has begun.
    GameStarted { room_id: RoomId },

    /// Sent to the player whose turn just began.
    TurnStarted { room_id: RoomId, player: PlayerInfo },

    /// The full dice state after a roll, sent to everyone in the room.
    DiceRolled {
        room_id: RoomId,
        player: PlayerInfo,
        dice: Dice,
        dice_rolls: u8,
    },

    /// Scorecards of every player, sent at the start of each turn.
    UpdateScorecard {
        room_id: RoomId,
        players: Vec<PlayerInfo>,
    },

    /// Final scorecards.
    GameOver {
        room_id: RoomId,
        players: Vec<PlayerInfo>,
    },

    /// Reply to [`Message::ListRooms`].
    RoomList { rooms: Vec<RoomId> },
}

impl Message {
    /// The message's type tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateRoom => "CreateRoom",
            Self::JoinRoom { .. } => "JoinRoom",
            Self::ListRooms => "ListRooms",
            Self::LeaveRoom { .. } => "LeaveRoom",
            Self::StartTurn { .. } => "StartTurn",
            Self::RollDice { .. } => "RollDice",
            Self::RerollDice { .. } => "RerollDice",
            Self::ChooseCategory { .. } => "ChooseCategory",
            Self::ServerJoin { .. } => "ServerJoin",
            Self::RoomCreated { .. } => "RoomCreated",
            Self::RoomJoined { .. } => "RoomJoined",
            Self::PlayerJoinedRoom { .. } => "PlayerJoinedRoom",
            Self::RoomLeft { .. } => "RoomLeft",
            Self::PlayerLeftRoom { .. } => "PlayerLeftRoom",
            Self::GameStarted { .. } => "GameStarted",
            Self::TurnStarted { .. } => "TurnStarted",
            Self::DiceRolled { .. } => "DiceRolled",
            Self::UpdateScorecard { .. } => "UpdateScorecard",
            Self::GameOver { .. } => "GameOver",
            Self::RoomList { .. } => "RoomList",
        }
    }

    /// The room this message is scoped to, if any.
    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            Self::CreateRoom
            | Self::ListRooms
            | Self::ServerJoin { .. }
            | Self::RoomList { .. } => None,
            Self::JoinRoom { room_id }
            | Self::LeaveRoom { room_id }
            | Self::StartTurn { room_id }
            | Self::RollDice { room_id }
            | Self::RerollDice { room_id, .. }
            | Self::ChooseCategory { room_id, .. }
            | Self::RoomCreated { room_id, .. }
            | Self::RoomJoined { room_id, .. }
            | Self::PlayerJoinedRoom { room_id, .. }
            | Self::RoomLeft { room_id, .. }
            | Self::PlayerLeftRoom { room_id, .. }
            | Self::GameStarted { room_id }
            | Self::TurnStarted { room_id, .. }
            | Self::DiceRolled { room_id, .. }
            | Self::UpdateScorecard { room_id, .. }
            | Self::GameOver { room_id, .. } => Some(room_id),
        }
    }

    /// Returns `true` for room-management requests a client may send.
    pub fn is_room_request(&self) -> bool {
        matches!(
            self,
            Self::CreateRoom
                | Self::JoinRoom { .. }
                | Self::ListRooms
                | Self::LeaveRoom { .. }
        )
    }

    /// Returns `true` for gameplay requests a client may send.
    pub fn is_gameplay_request(&self) -> bool {
        matches!(
            self,
            Self::StartTurn { .. }
                | Self::RollDice { .. }
                | Self::RerollDice { .. }
                | Self::ChooseCategory { .. }
        )
    }
}
