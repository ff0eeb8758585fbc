//! Error types for the core crate.
//!
//! Game rule violations are not errors here: they are
//! [`RejectReason`](wordbattle_protocol::RejectReason) values returned by
//! [`Room`](crate::Room) methods.

use std::path::PathBuf;

/// Errors that can occur while loading a word list.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// The file could not be read.
    #[error("failed to read word list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was read but held no playable words.
    #[error("word list {} contains no playable words", .0.display())]
    Empty(PathBuf),
}
