//! Reason codes for rejected actions.

use serde::{Deserialize, Serialize};

/// Why an action was refused.
///
/// Every illegal action yields exactly one of these, delivered only to the
/// participant who sent it inside a `MOVE_REJECTED` event. A rejection
/// never corrupts room state.
///
/// The engine returns these directly as its error type, so each variant
/// also carries a human-readable message for logs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    // -- registry / membership --
    #[error("room not found")]
    RoomNotFound,
    #[error("room is full")]
    RoomFull,
    #[error("connection is already seated in a room")]
    AlreadyInRoom,
    #[error("sender is not a member of this room")]
    NotInRoom,
    #[error("player name is empty or too long")]
    InvalidName,

    // -- game lifecycle --
    #[error("only the room owner can start the game")]
    OnlyOwnerCanStart,
    #[serde(rename = "NEED_AT_LEAST_2_PLAYERS")]
    #[error("at least two players are needed to start")]
    NeedAtLeastTwoPlayers,
    #[error("game has not started")]
    GameNotStarted,
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("game is over")]
    GameOver,

    // -- turn ownership / phase --
    #[error("not your turn")]
    NotYourTurn,
    #[error("player has been eliminated")]
    PlayerEliminated,
    #[error("a letter must be placed first")]
    MustPlaceLetterFirst,
    #[error("a letter was already placed this turn")]
    LetterAlreadyPlaced,

    // -- placement --
    #[error("cell is outside the grid")]
    OutOfBounds,
    #[error("cell is already filled")]
    CellOccupied,
    #[error("letter must be a single A-Z character")]
    InvalidLetter,

    // -- word attempts --
    #[error("selected cells are not in one row or column")]
    NotStraightLine,
    #[error("selected cells have a gap")]
    NotContinuous,
    #[error("selection includes an empty cell")]
    EmptyCell,
    #[error("not an English word")]
    InvalidEnglishWord,
    #[error("a variation of this word was already played")]
    WordVariationUsed,
    #[error("word was already played")]
    WordUsed,

    // -- revive --
    #[error("player not found")]
    PlayerNotFound,
    #[error("revive is not allowed now")]
    ImBackNotAllowed,

    // -- transport --
    #[error("chat message is empty or too long")]
    InvalidMessage,
    #[error("action could not be decoded")]
    MalformedAction,
}
