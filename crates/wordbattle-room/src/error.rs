//! Error types for the room layer.

use wordbattle_protocol::{PlayerId, RejectReason, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The connection already sits in a room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The connection is not seated in the room it addressed.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The room's game refused the request.
    #[error(transparent)]
    Rejected(#[from] RejectReason),

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

impl RoomError {
    /// The reason code to send back to the client.
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::NotFound(_) | Self::Unavailable(_) => RejectReason::RoomNotFound,
            Self::AlreadyInRoom(..) => RejectReason::AlreadyInRoom,
            Self::NotInRoom(..) => RejectReason::NotInRoom,
            Self::Rejected(reason) => *reason,
        }
    }
}
