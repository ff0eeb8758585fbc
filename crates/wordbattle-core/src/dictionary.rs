//! Word lists.
//!
//! The engine only asks one question of a dictionary: is this a word? The
//! [`Dictionary`] trait keeps that seam open so tests and alternative
//! sources can stand in for the file-backed [`WordList`].

use std::collections::HashSet;
use std::path::Path;

use crate::DictionaryError;

/// Answers membership queries. Lookups are case-insensitive.
///
/// `Send + Sync` because one dictionary is shared by every room.
pub trait Dictionary: Send + Sync {
    fn contains(&self, word: &str) -> bool;
}

/// An in-memory set of accepted words.
///
/// Only entries of three or more ASCII letters are kept. Everything is
/// stored uppercased.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Builds a list from raw entries, dropping anything that does not
    /// normalize to a playable word.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .filter_map(|w| normalize(w.as_ref()))
            .collect();
        Self { words }
    }

    /// Reads a newline-separated word file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::from_words(text.lines());
        if list.is_empty() {
            return Err(DictionaryError::Empty(path.to_path_buf()));
        }
        tracing::info!(path = %path.display(), words = list.len(), "word list loaded");
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_ascii_uppercase())
    }
}

fn normalize(raw: &str) -> Option<String> {
    let word = raw.trim().to_ascii_uppercase();
    (word.len() >= 3 && word.bytes().all(|b| b.is_ascii_uppercase())).then_some(word)
}
