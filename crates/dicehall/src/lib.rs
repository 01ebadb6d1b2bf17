//! # Dicehall
//!
//! A multiplayer dice game server. Players connect over WebSockets, gather
//! in rooms and take turns rolling five dice and filling a thirteen-line
//! scorecard. The server owns all game state; clients only send requests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dicehall::prelude::*;
//!
//! # async fn serve() -> Result<(), DicehallError> {
//! let server = DicehallServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod connection;
mod error;
mod handler;
mod server;

pub use connection::CodecConnection;
pub use error::DicehallError;
pub use server::{DicehallServer, DicehallServerBuilder, WsPlayer};

/// Everything needed to run a server and speak its protocol.
pub mod prelude {
    pub use crate::{DicehallError, DicehallServer, DicehallServerBuilder};
    pub use dicehall_protocol::{
        Codec, Dice, Die, JsonCodec, Message, PlayerId, PlayerInfo, RoomId, ScoreCategory,
        Scorecard,
    };
    pub use dicehall_room::{DiceFactory, DiceSource, RandomDice, RoomConfig, RoomState};
}
