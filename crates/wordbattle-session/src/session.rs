//! Session types: the server's record of one seated player.
//!
//! A session tracks:
//! - WHICH connection currently speaks for the seat (`PlayerId`)
//! - WHERE the seat is (`RoomId`)
//! - WHAT state the connection is in (connected, disconnected, expired)
//! - HOW the seat can be reclaimed (a secret token)

use std::time::Instant;

use wordbattle_protocol::{PlayerId, RoomId};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long (in seconds) a disconnected player's rejoin token stays
    /// valid.
    ///
    /// Default: 120 seconds, three turns' worth. Set to 0 to disable
    /// token rejoin after a disconnect.
    pub reconnect_grace_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_grace_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The state of a session's connection.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(grace elapsed)──→ Expired
///       ↑                            │
///       └──────────(rejoin)──────────┘
/// ```
///
/// The seat in the room is unaffected by any of this; only the token's
/// validity is.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// A live connection holds the seat.
    Connected,

    /// The connection dropped at `since`.
    Disconnected { since: Instant },

    /// The grace period passed. The token no longer works and the session
    /// is removed on the next cleanup.
    Expired,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One seated player's session.
///
/// Created when a connection creates or joins a room. A rejoin moves the
/// session to the new connection's id and keeps the token.
#[derive(Debug, Clone)]
pub struct Session {
    /// The connection currently holding the seat.
    pub player_id: PlayerId,

    /// The room the seat is in, once bound.
    pub room_id: Option<RoomId>,

    /// Current connection state.
    pub state: SessionState,

    /// Secret for reclaiming the seat from a new connection.
    ///
    /// A 32-character hex string (128 bits of randomness), sent to the
    /// client once in the `WELCOME` event.
    pub reconnect_token: String,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }
}
