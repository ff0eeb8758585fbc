//! Player session management for Word Battle.
//!
//! A session is the server's memory of a seated player beyond the life of
//! one connection:
//!
//! 1. **Tracking**: which connection sits in which room ([`SessionManager`])
//! 2. **Rejoin tokens**: a secret issued at join time that lets a new
//!    connection reclaim the seat
//! 3. **Grace period**: how long a dropped player's token stays valid
//!
//! # How it fits in the stack
//!
//! ```text
//! Server handler (above)  ← creates sessions on join, resolves tokens on rejoin
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol layer (below)  ← PlayerId, RoomId
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Session, SessionConfig, SessionState};
