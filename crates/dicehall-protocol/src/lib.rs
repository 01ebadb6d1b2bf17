//! Wire protocol for Dicehall.
//!
//! This crate defines what the server and its players say to each other:
//!
//! - **Game data** ([`Die`], [`ScoreCategory`], [`Scorecard`],
//!   [`PlayerInfo`]): the values a message can carry.
//! - **Messages** ([`Message`]): every request and notification, as one
//!   internally tagged enum.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (bytes) → Protocol (Message) → Room core (state transitions)
//! ```

mod codec;
mod error;
mod message;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use message::Message;
pub use types::{
    DICE_COUNT, Dice, Die, PlayerId, PlayerInfo, Recipient, RoomId,
    ScoreCategory, ScoreEntry, Scorecard,
};
