//! Unified error type for the Word Battle server.

use wordbattle_core::DictionaryError;
use wordbattle_protocol::ProtocolError;
use wordbattle_room::RoomError;
use wordbattle_session::SessionError;
use wordbattle_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WordBattleError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (token, expiry).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (not found, rejected, unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The word list could not be loaded.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}
