//! Transport abstraction layer for Dicehall.
//!
//! Provides the [`Transport`] and [`Connection`] traits that move opaque
//! byte frames between the server and a player. Nothing in this crate knows
//! what a message means; framing and encoding live one layer up.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    fn accept(
        &mut self,
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;
}

/// A single connection that can send and receive byte frames.
///
/// Sends and receives may run concurrently from different tasks: a player's
/// own handler sits in [`recv`](Self::recv) while other players' handlers
/// push broadcasts through [`send`](Self::send).
///
/// The returned futures are `Send` so generic callers can be spawned onto
/// the multi-threaded runtime.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one frame to the remote peer.
    fn send(
        &self,
        data: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send;

    /// Closes the connection.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_round_trips_and_displays() {
        let id = ConnectionId::new(7);
        assert_eq!(id.into_inner(), 7);
        assert_eq!(id.to_string(), "conn-7");
        assert_ne!(id, ConnectionId::new(8));
    }

    #[test]
    fn test_transport_error_messages() {
        let err = TransportError::ConnectionClosed("peer went away".into());
        assert_eq!(err.to_string(), "connection closed: peer went away");

        let err = TransportError::HandshakeFailed("no upgrade header".into());
        assert!(err.to_string().contains("no upgrade header"));
    }
}
