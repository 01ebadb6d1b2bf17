//! Core data types carried by Dicehall messages.
//!
//! Everything here is plain data: identifiers, dice, score categories, and
//! the scorecard. The rules that act on this data live in `dicehall-room`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of dice in play. A room always holds exactly this many.
pub const DICE_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable, process-unique identifier for a connected player.
///
/// Players are compared by this value, never by object identity or by
/// display name. Two snapshots of the same player always carry the same
/// `PlayerId`, so comparing a [`PlayerInfo`] against a live player is safe.
///
/// Serialized as a bare number (`PlayerId(42)` becomes `42`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique room identifier.
///
/// Room ids are opaque generated tokens; clients only ever echo back ids the
/// server gave them. Serialized as a bare string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps a string as a room id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive an outbound message produced by a room transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Every player except the given one.
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if a player with `id` is addressed.
    pub fn includes(&self, id: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(target) => *target == id,
            Self::AllExcept(excluded) => *excluded != id,
        }
    }
}

// ---------------------------------------------------------------------------
// Dice
// ---------------------------------------------------------------------------

/// One die: its face value and whether it is held out of the next roll.
///
/// A freshly created die has value 0, meaning "not rolled yet".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct Die {
    /// Face value, 1..=6 once rolled.
    pub value: u8,
    /// Held dice keep their value on the next roll.
    pub held: bool,
}

impl Die {
    /// Creates an unheld die showing `value`.
    pub fn new(value: u8) -> Self {
        Self { value, held: false }
    }

    /// Returns `true` once the die shows a real face.
    pub fn is_rolled(&self) -> bool {
        (1..=6).contains(&self.value)
    }
}

/// The fixed set of dice in a room.
pub type Dice = [Die; DICE_COUNT];

// ---------------------------------------------------------------------------
// Score categories
// ---------------------------------------------------------------------------

/// The thirteen scoring categories. Six upper-section face categories,
/// then seven lower-section combinations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub enum ScoreCategory {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl ScoreCategory {
    /// Every category in scorecard order.
    pub const ALL: [ScoreCategory; 13] = [
        Self::Ones,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
        Self::ThreeOfAKind,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Yahtzee,
        Self::Chance,
    ];

    /// Position of this category on the scorecard (0..13).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The face an upper-section category counts, or `None` for the
    /// lower section.
    pub fn face(self) -> Option<u8> {
        match self {
            Self::Ones => Some(1),
            Self::Twos => Some(2),
            Self::Threes => Some(3),
            Self::Fours => Some(4),
            Self::Fives => Some(5),
            Self::Sixes => Some(6),
            _ => None,
        }
    }

    /// The category's name as it appears on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ones => "Ones",
            Self::Twos => "Twos",
            Self::Threes => "Threes",
            Self::Fours => "Fours",
            Self::Fives => "Fives",
            Self::Sixes => "Sixes",
            Self::ThreeOfAKind => "ThreeOfAKind",
            Self::FourOfAKind => "FourOfAKind",
            Self::FullHouse => "FullHouse",
            Self::SmallStraight => "SmallStraight",
            Self::LargeStraight => "LargeStraight",
            Self::Yahtzee => "Yahtzee",
            Self::Chance => "Chance",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Scorecard
// ---------------------------------------------------------------------------

/// One scorecard line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct ScoreEntry {
    pub score: u32,
    pub filled: bool,
}

/// A player's scorecard: one [`ScoreEntry`] per category.
///
/// A line is written at most once. `filled` goes from `false` to `true`
/// exactly once and never back; [`record`](Self::record) refuses a second
/// write.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct Scorecard {
    entries: [ScoreEntry; 13],
}

impl Scorecard {
    /// Creates an empty scorecard with every line open.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the line for `category`.
    pub fn entry(&self, category: ScoreCategory) -> ScoreEntry {
        self.entries[category.index()]
    }

    /// Returns the recorded score, or `None` if the line is still open.
    pub fn score(&self, category: ScoreCategory) -> Option<u32> {
        let entry = self.entry(category);
        entry.filled.then_some(entry.score)
    }

    /// Returns `true` if `category` has been scored.
    pub fn is_filled(&self, category: ScoreCategory) -> bool {
        self.entry(category).filled
    }

    /// Writes `score` into `category` and marks it filled.
    ///
    /// Returns `false` and leaves the card untouched if the line was
    /// already filled.
    pub fn record(&mut self, category: ScoreCategory, score: u32) -> bool {
        let entry = &mut self.entries[category.index()];
        if entry.filled {
            return false;
        }
        *entry = ScoreEntry {
            score,
            filled: true,
        };
        true
    }

    /// Sum of all filled lines.
    pub fn total(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.filled)
            .map(|e| e.score)
            .sum()
    }

    /// Categories that can still be scored, in scorecard order.
    pub fn open_categories(&self) -> Vec<ScoreCategory> {
        ScoreCategory::ALL
            .into_iter()
            .filter(|c| !self.is_filled(*c))
            .collect()
    }

    /// Returns `true` once every line is filled.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|e| e.filled)
    }
}

// ---------------------------------------------------------------------------
// PlayerInfo
// ---------------------------------------------------------------------------

/// A detached snapshot of a player for outbound messages.
///
/// Carries no connection and is never written back into room state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub scorecard: Scorecard,
}

// =========================================================================
// Tests
// =========================================================================
