//! The room's record of accepted words.

use std::collections::HashSet;

use wordbattle_protocol::RejectReason;

/// Suffixes that turn one word into a "variation" of another.
const VARIATION_SUFFIXES: [&str; 4] = ["S", "ES", "ED", "ING"];

/// Words already accepted in a room.
///
/// Besides exact repeats, a word is refused if it differs from an accepted
/// word by exactly one suffix from a small fixed set, in either direction:
/// with `CAT` accepted, both `CATS` and (had `CATS` come first) `CAT` are
/// variations. This is a cheap anti-repetition heuristic, not stemming.
/// Chained suffixes (`CAT` → `CATSES`) are not detected.
///
/// The variation check scans every accepted word. A room fills at most a
/// few hundred cells, so the ledger stays small.
#[derive(Debug, Clone, Default)]
pub struct UsedWords {
    words: HashSet<String>,
}

impl UsedWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `word` may still be played. Variations are reported
    /// before exact duplicates.
    pub fn check(&self, word: &str) -> Result<(), RejectReason> {
        if self.words.iter().any(|used| is_variation(used, word)) {
            return Err(RejectReason::WordVariationUsed);
        }
        if self.words.contains(word) {
            return Err(RejectReason::WordUsed);
        }
        Ok(())
    }

    /// Records an accepted word. Returns `false` if it was already present.
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// `a` is `b` plus one suffix, or `b` is `a` plus one suffix.
pub fn is_variation(a: &str, b: &str) -> bool {
    VARIATION_SUFFIXES.iter().any(|suffix| {
        a.strip_suffix(suffix) == Some(b) || b.strip_suffix(suffix) == Some(a)
    })
}
