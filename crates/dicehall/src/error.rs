//! Unified error type for the Dicehall server.

use dicehall_protocol::ProtocolError;
use dicehall_room::RoomError;
use dicehall_transport::TransportError;

/// Top-level error that wraps every layer's errors.
///
/// `#[from]` on each variant lets `?` convert layer errors directly.
#[derive(Debug, thiserror::Error)]
pub enum DicehallError {
    /// A transport-level error (bind, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, not found, invalid state).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicehall_protocol::{Codec, JsonCodec, Message, RoomId};

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let dicehall_err: DicehallError = err.into();
        assert!(matches!(dicehall_err, DicehallError::Transport(_)));
        assert!(dicehall_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = JsonCodec.decode::<Message>(b"{").unwrap_err();
        let dicehall_err: DicehallError = err.into();
        assert!(matches!(dicehall_err, DicehallError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomId::new("lobby"));
        let dicehall_err: DicehallError = err.into();
        assert!(matches!(dicehall_err, DicehallError::Room(_)));
        assert!(dicehall_err.to_string().contains("lobby"));
    }
}
