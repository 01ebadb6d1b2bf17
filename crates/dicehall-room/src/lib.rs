//! Rooms and the dice game played in them.
//!
//! A room is a plain state machine behind a per-room lock. Transitions
//! never touch the network: they return addressed messages, which the
//! coordinators resolve and send once the lock is released.
//!
//! # Key types
//!
//! - [`Room`]: players, dice and turn order for one game
//! - [`RoomRegistry`]: creates, finds and destroys rooms
//! - [`RoomLifecycleCoordinator`]: create, join, leave and list requests
//! - [`GameplayCoordinator`]: turn, roll, reroll and scoring requests
//! - [`PlayerConnection`]: how a player is reached
//! - [`DiceSource`]: where dice faces come from
//! - [`RoomConfig`] and [`RoomState`]: room settings and lifecycle

mod config;
mod connection;
mod dice;
mod error;
mod gameplay;
mod lifecycle;
mod player;
mod registry;
mod room;
pub mod score;
pub mod testing;

pub use config::{RoomConfig, RoomState};
pub use connection::{Delivery, PlayerConnection, deliver};
pub use dice::{DiceFactory, DiceSource, RandomDice, random_dice};
pub use error::{GameError, RoomError};
pub use gameplay::GameplayCoordinator;
pub use lifecycle::{Membership, RoomLifecycleCoordinator};
pub use player::{Player, PlayerHandle};
pub use registry::{Departure, Founding, RoomRegistry, SharedRoom};
pub use room::{Outbox, Room, RoomInfo, TurnOutcome, TurnStep};
