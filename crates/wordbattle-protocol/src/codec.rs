//! Codec trait and the JSON implementation.
//!
//! The server never serializes frames directly; it goes through a
//! [`Codec`] so the wire format is chosen in one place. The browser client
//! speaks JSON, so [`JsonCodec`] is the only implementation today.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes outbound values to frame bytes and decodes inbound frames.
///
/// `Send + Sync + 'static` because a single codec instance is shared by
/// every connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into frame bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes frame bytes into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Whether encoded frames are valid UTF-8 and should go out as text.
    fn is_text(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use wordbattle_protocol::{ClientAction, Codec, JsonCodec, RoomId};
///
/// let codec = JsonCodec;
/// let action: ClientAction = codec
///     .decode(br#"{"type":"PASS_TURN","room_id":"ABC123"}"#)
///     .unwrap();
/// assert_eq!(action, ClientAction::PassTurn { room_id: RoomId::new("ABC123") });
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }

    fn is_text(&self) -> bool {
        true
    }
}
