//! Core protocol types for the Word Battle wire format.
//!
//! Every type here is serialized to JSON and sent over a WebSocket text
//! frame. Both directions use internally tagged enums:
//!
//! ```text
//! { "type": "PLACE_LETTER", "room_id": "K3ZQ7A", "row": 7, "col": 7, "letter": "E" }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::RejectReason;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Connection-scoped identity of a player.
///
/// A fresh id is issued for every connection. When a player rejoins on a
/// new connection their seat is rebound to the new id and the old one is
/// never valid again.
///
/// `#[serde(transparent)]` keeps it a plain number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Short human-shareable room code, e.g. `K3ZQ7A`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Wraps a room code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient: who should receive an event?
// ---------------------------------------------------------------------------

/// Addressing for an outbound event produced by a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every connected member of the room.
    All,
    /// One specific member.
    Player(PlayerId),
    /// Every member except one (used to tell others about a rejoin).
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// Lifecycle of a room's game.
///
/// ```text
/// Lobby → InProgress → Ended
/// ```
///
/// `Ended` is terminal: playing again needs a fresh room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    Lobby,
    InProgress,
    Ended,
}

impl GameState {
    /// Returns `true` while new players may join.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` while turns are being played.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// The only state reachable from this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Lobby => Some(Self::InProgress),
            Self::InProgress => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    /// Returns `true` if moving to `target` follows the lifecycle order.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "LOBBY"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Ended => write!(f, "ENDED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Records embedded in events
// ---------------------------------------------------------------------------

/// A grid coordinate as sent by clients.
///
/// Signed so that a negative coordinate still decodes and is refused with
/// `OUT_OF_BOUNDS` instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: i32,
    pub col: i32,
}

impl CellRef {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Lobby roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
}

/// Full per-player standing, sent in rejoin snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub lives: u8,
    pub is_active: bool,
}

/// One line of the final ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    /// 1-based position.
    pub rank: u32,
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// An action sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientAction {
    /// Open a new room with the sender as owner.
    CreateRoom { player_name: String },

    /// Take a seat in an existing lobby.
    JoinRoom { room_id: RoomId, player_name: String },

    /// Owner only: leave the lobby and play the first turn.
    StartGame { room_id: RoomId },

    /// Fill one empty cell during the placement phase.
    PlaceLetter {
        room_id: RoomId,
        row: i32,
        col: i32,
        letter: char,
    },

    /// Claim a word along a straight, gap-free run of cells. The order of
    /// `cells` does not matter; only geometry does.
    AttemptWord { room_id: RoomId, cells: Vec<CellRef> },

    /// End the turn after placing a letter, without claiming a word.
    PassTurn { room_id: RoomId },

    /// One-shot revive from the brink of elimination.
    ImBack { room_id: RoomId },

    /// Reclaim a seat from a new connection. `token` is the secret from
    /// the `WELCOME` event; without it the seat is matched by name.
    RejoinRoom {
        room_id: RoomId,
        player_name: String,
        #[serde(default)]
        token: Option<String>,
    },

    /// Say something to the room.
    ChatMessage { room_id: RoomId, message: String },
}

impl ClientAction {
    /// The room this action targets, if it names one.
    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            Self::CreateRoom { .. } => None,
            Self::JoinRoom { room_id, .. }
            | Self::StartGame { room_id }
            | Self::PlaceLetter { room_id, .. }
            | Self::AttemptWord { room_id, .. }
            | Self::PassTurn { room_id }
            | Self::ImBack { room_id }
            | Self::RejoinRoom { room_id, .. }
            | Self::ChatMessage { room_id, .. } => Some(room_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// An event sent by the server, either broadcast to a room or addressed
/// to a single member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    /// Broadcast when a room opens.
    RoomCreated {
        room_id: RoomId,
        owner_id: PlayerId,
        players: Vec<PlayerSummary>,
    },

    /// Broadcast with the updated lobby roster.
    PlayerJoined { players: Vec<PlayerSummary> },

    /// To the sender after create/join: their identity and rejoin secret.
    Welcome {
        room_id: RoomId,
        player_id: PlayerId,
        token: String,
    },

    GameStarted,

    /// A new turn began. `time_limit` is in seconds.
    TurnUpdate {
        current_player_id: PlayerId,
        time_limit: u64,
    },

    LetterPlaced {
        row: i32,
        col: i32,
        letter: char,
        player_id: PlayerId,
    },

    WordResult {
        player_id: PlayerId,
        word: String,
        points: u32,
    },

    LifeLost { player_id: PlayerId, lives: u8 },

    PlayerEliminated { player_id: PlayerId },

    ImBackOk { player_id: PlayerId, lives: u8 },

    /// Final ranking, best first, at most three entries.
    GameEnded { ranking: Vec<RankEntry> },

    /// Full state snapshot for a rejoining connection.
    RejoinSuccess {
        room_id: RoomId,
        player_id: PlayerId,
        owner_id: Option<PlayerId>,
        state: GameState,
        players: Vec<PlayerStanding>,
        grid: Vec<Vec<Option<char>>>,
        current_player_id: Option<PlayerId>,
        time_limit: u64,
        time_remaining: u64,
    },

    /// To the other members: a seat moved to a new connection id.
    PlayerRejoined {
        previous_id: PlayerId,
        player_id: PlayerId,
    },

    ChatMessage {
        player_id: PlayerId,
        name: String,
        message: String,
    },

    /// To the sender only.
    MoveRejected { reason: RejectReason },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The browser client parses these shapes by hand, so the tests pin the
    //! exact JSON layout rather than just round-tripping.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&PlayerId(42)).unwrap(), "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomId::new("AB12CD")).unwrap();
        assert_eq!(json, "\"AB12CD\"");
        assert_eq!(RoomId::new("AB12CD").to_string(), "AB12CD");
    }

    #[test]
    fn test_game_state_follows_strict_order() {
        assert_eq!(GameState::Lobby.next(), Some(GameState::InProgress));
        assert_eq!(GameState::InProgress.next(), Some(GameState::Ended));
        assert_eq!(GameState::Ended.next(), None);
        assert!(!GameState::Lobby.can_transition_to(GameState::Ended));
        assert!(!GameState::Ended.can_transition_to(GameState::Lobby));
    }

    #[test]
    fn test_game_state_predicates() {
        assert!(GameState::Lobby.is_joinable());
        assert!(!GameState::InProgress.is_joinable());
        assert!(GameState::InProgress.is_in_progress());
        assert!(!GameState::Ended.is_in_progress());
        assert_eq!(GameState::InProgress.to_string(), "IN_PROGRESS");
    }

    #[test]
    fn test_place_letter_json_format() {
        let json = r#"{"type":"PLACE_LETTER","room_id":"R1","row":0,"col":2,"letter":"t"}"#;
        let action: ClientAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            ClientAction::PlaceLetter {
                room_id: RoomId::new("R1"),
                row: 0,
                col: 2,
                letter: 't',
            }
        );
    }

    #[test]
    fn test_place_letter_rejects_multi_char_letter() {
        let json = r#"{"type":"PLACE_LETTER","room_id":"R1","row":0,"col":2,"letter":"AB"}"#;
        assert!(serde_json::from_str::<ClientAction>(json).is_err());
    }

    #[test]
    fn test_attempt_word_accepts_negative_coordinates() {
        let json = r#"{"type":"ATTEMPT_WORD","room_id":"R1","cells":[{"row":-1,"col":0}]}"#;
        let action: ClientAction = serde_json::from_str(json).unwrap();
        match action {
            ClientAction::AttemptWord { cells, .. } => {
                assert_eq!(cells, vec![CellRef::new(-1, 0)]);
            }
            other => panic!("expected AttemptWord, got {other:?}"),
        }
    }

    #[test]
    fn test_rejoin_token_is_optional() {
        let json = r#"{"type":"REJOIN_ROOM","room_id":"R1","player_name":"ana"}"#;
        let action: ClientAction = serde_json::from_str(json).unwrap();
        assert!(matches!(action, ClientAction::RejoinRoom { token: None, .. }));
    }

    #[test]
    fn test_create_room_has_no_room_id() {
        let action = ClientAction::CreateRoom {
            player_name: "ana".into(),
        };
        assert_eq!(action.room_id(), None);

        let action = ClientAction::ImBack {
            room_id: RoomId::new("R9"),
        };
        assert_eq!(action.room_id(), Some(&RoomId::new("R9")));
    }

    #[test]
    fn test_unknown_action_type_is_rejected() {
        let json = r#"{"type":"FLY_TO_MOON","room_id":"R1"}"#;
        assert!(serde_json::from_str::<ClientAction>(json).is_err());
    }

    #[test]
    fn test_turn_update_json_format() {
        let event = ServerEvent::TurnUpdate {
            current_player_id: PlayerId(3),
            time_limit: 40,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TURN_UPDATE");
        assert_eq!(json["current_player_id"], 3);
        assert_eq!(json["time_limit"], 40);
    }

    #[test]
    fn test_unit_event_has_only_type_tag() {
        let json: serde_json::Value = serde_json::to_value(&ServerEvent::GameStarted).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "GAME_STARTED" }));
    }

    #[test]
    fn test_move_rejected_json_format() {
        let event = ServerEvent::MoveRejected {
            reason: RejectReason::WordVariationUsed,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MOVE_REJECTED");
        assert_eq!(json["reason"], "WORD_VARIATION_USED");
    }

    #[test]
    fn test_rejoin_snapshot_grid_uses_null_for_empty_cells() {
        let event = ServerEvent::RejoinSuccess {
            room_id: RoomId::new("R1"),
            player_id: PlayerId(9),
            owner_id: Some(PlayerId(1)),
            state: GameState::InProgress,
            players: vec![],
            grid: vec![vec![Some('C'), None]],
            current_player_id: Some(PlayerId(9)),
            time_limit: 40,
            time_remaining: 12,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["grid"], serde_json::json!([["C", null]]));
        assert_eq!(json["state"], "IN_PROGRESS");
    }
}
