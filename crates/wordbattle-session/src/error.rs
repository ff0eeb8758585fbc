//! Error types for the session layer.

use wordbattle_protocol::PlayerId;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given connection.
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    /// The rejoin token doesn't match anything the server issued, or its
    /// session was already cleaned up.
    #[error("invalid rejoin token")]
    InvalidToken,

    /// The grace period elapsed before the player came back.
    #[error("session expired for player {0}")]
    SessionExpired(PlayerId),

    /// The connection already holds a live session.
    #[error("player {0} already has an active session")]
    AlreadyConnected(PlayerId),
}
