//! Game engine for Word Battle.
//!
//! Everything here is synchronous and owns no I/O: a [`Room`] receives
//! actions, enforces the rules, and returns the events to deliver. Timers
//! and connections live in the crates above.
//!
//! # Key types
//!
//! - [`Room`]: the turn state machine for one game
//! - [`Grid`]: the shared letter matrix
//! - [`Player`]: score, lives, and revive state for one seat
//! - [`UsedWords`]: accepted words and the variation rule
//! - [`Dictionary`] / [`WordList`]: word lookups
//! - [`GameConfig`]: rules and limits

mod config;
mod dictionary;
mod error;
mod grid;
mod ledger;
mod player;
mod room;
pub mod validator;

use wordbattle_protocol::{Recipient, ServerEvent};

pub use config::GameConfig;
pub use dictionary::{Dictionary, WordList};
pub use error::DictionaryError;
pub use grid::Grid;
pub use ledger::{UsedWords, is_variation};
pub use player::Player;
pub use room::{Deadline, Room, ScoredWord, TurnToken, WordAttempt};

/// An event together with who should receive it.
pub type Outbound = (Recipient, ServerEvent);
