//! Room lifecycle management for Word Battle.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns one
//! [`Room`](wordbattle_core::Room) engine and its turn timer.
//!
//! # Key types
//!
//! - [`RoomManager`]: creates/destroys rooms, routes players
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomAction`]: in-room actions a seated player can take
//! - [`RoomConfig`]: room settings (channel size, code length, rules)

mod config;
mod error;
mod manager;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{PlayerSender, RejoinTarget, RoomAction, RoomHandle, RoomInfo};
