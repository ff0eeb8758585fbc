//! Wire protocol for the Word Battle server.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientAction`], [`ServerEvent`], [`RejectReason`], ids and
//!   roster records): the JSON shapes that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   converted to and from frame bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding or
//!   decoding.
//!
//! ```text
//! Transport (frames) → Protocol (ClientAction / ServerEvent) → Room
//! ```

mod codec;
mod error;
mod reason;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use reason::RejectReason;
pub use types::{
    CellRef, ClientAction, GameState, PlayerId, PlayerStanding, PlayerSummary,
    RankEntry, Recipient, RoomId, ServerEvent,
};
