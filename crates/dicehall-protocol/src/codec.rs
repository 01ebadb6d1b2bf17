//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A codec converts between Rust values and raw frames. The room core never
//! calls a codec directly; the server wraps a transport connection and a
//! codec into a message-level connection.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` so one codec value can be shared by every
/// connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ```rust
/// use dicehall_protocol::{Codec, JsonCodec, Message, RoomId};
///
/// let codec = JsonCodec;
/// let msg = Message::JoinRoom { room_id: RoomId::new("lobby") };
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: Message = codec.decode(&bytes).unwrap();
/// assert_eq!(msg, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Die, Message, RoomId, ScoreCategory};

    #[test]
    fn test_json_codec_decodes_hand_written_request() {
        let json = br#"{"type":"ChooseCategory","room_id":"abc","category":"FullHouse"}"#;
        let msg: Message = JsonCodec.decode(json).unwrap();
        assert_eq!(
            msg,
            Message::ChooseCategory {
                room_id: RoomId::new("abc"),
                category: ScoreCategory::FullHouse,
            }
        );
    }

    #[test]
    fn test_json_codec_preserves_reroll_hint() {
        let mut dice = [Die::new(2); 5];
        dice[1].held = true;
        dice[4].held = true;
        let msg = Message::RerollDice {
            room_id: RoomId::new("r1"),
            dice,
        };

        let bytes = JsonCodec.encode(&msg).unwrap();
        let decoded: Message = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_json_codec_rejects_garbage() {
        let result: Result<Message, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_rejects_unknown_category() {
        let json = br#"{"type":"ChooseCategory","room_id":"abc","category":"Bonus"}"#;
        let result: Result<Message, _> = JsonCodec.decode(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_codec_rejects_short_dice_array() {
        let json = br#"{"type":"RerollDice","room_id":"abc","dice":[{"value":1,"held":true}]}"#;
        let result: Result<Message, _> = JsonCodec.decode(json);
        assert!(result.is_err());
    }
}
