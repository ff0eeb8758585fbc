//! # Word Battle
//!
//! A room-based, turn-taking word-grid game server.
//!
//! Players gather in a room under a short code, take turns placing one
//! letter on a shared grid, and may then claim a word made of a straight
//! run of adjacent letters. Turns are timed; running out of time costs a
//! life, and the game ends when at most one player is left standing or
//! the grid is full.
//!
//! The server is authoritative. Clients speak JSON over WebSocket:
//!
//! ```text
//! Transport (frames) → Protocol (ClientAction) → Room actor → Room (rules)
//!                                                    │
//!                     Transport ← Protocol ← ────────┘ (ServerEvent)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use wordbattle::prelude::*;
//!
//! # async fn run() -> Result<(), WordBattleError> {
//! let words = WordList::load("words.txt")?;
//! let server = WordBattleServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .dictionary(Arc::new(words))
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::WordBattleError;
pub use server::{WordBattleServer, WordBattleServerBuilder};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{WordBattleError, WordBattleServer, WordBattleServerBuilder};
    pub use wordbattle_core::{Dictionary, GameConfig, WordList};
    pub use wordbattle_protocol::{
        CellRef, ClientAction, GameState, PlayerId, RejectReason, RoomId, ServerEvent,
    };
    pub use wordbattle_room::RoomConfig;
    pub use wordbattle_session::SessionConfig;
}
