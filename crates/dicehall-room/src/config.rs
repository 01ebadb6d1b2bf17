//! Room configuration and lifecycle state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Settings shared by every room a registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Players needed before the game starts. Reaching this count on a
    /// join starts the game automatically.
    pub min_players: usize,

    /// Maximum players allowed in the room.
    ///
    /// Joins are only accepted before the game starts, and the game starts
    /// as soon as `min_players` have joined, so a room never holds more than
    /// `min_players`. This cap only refuses joins when it is set below
    /// `min_players`, and such a room never starts. With the defaults it is
    /// never reached.
    pub max_players: usize,

    /// Rounds per game. Every player takes one turn per round.
    pub rounds: u32,

    /// Rolls allowed per turn, the first roll included.
    pub max_rolls: u8,

    /// Pick the first player at random instead of the first to join.
    pub random_start: bool,
}

impl RoomConfig {
    /// Total turns in a game with `players` players.
    pub fn total_turns(&self, players: usize) -> u32 {
        self.rounds.saturating_mul(players as u32)
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 6,
            rounds: 13,
            max_rolls: 3,
            random_start: false,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Waiting → Active → Finished
/// ```
///
/// - **Waiting**: accepting joins, game not started.
/// - **Active**: game running; gameplay actions are accepted.
/// - **Finished**: game over fired. A finished room is never reactivated;
///   players can only leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    Waiting,
    Active,
    Finished,
}

impl RoomState {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` while a game is running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The only state reachable from this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Active),
            Self::Active => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Active => write!(f, "Active"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
