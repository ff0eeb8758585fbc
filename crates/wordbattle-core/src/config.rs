//! Game rules configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable rules for one room's game.
///
/// The defaults are the classic ruleset: a 15×15 grid, 40 second turns and
/// two lives per player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Grid height.
    pub rows: usize,

    /// Grid width.
    pub cols: usize,

    /// How long the current player has to finish a turn.
    pub turn_time: Duration,

    /// Lives each player starts with. A revive restores this many.
    pub starting_lives: u8,

    /// Minimum seated players before the owner may start.
    pub min_players: usize,

    /// Maximum seated players.
    pub max_players: usize,

    /// Entries in the final ranking.
    pub ranking_size: usize,

    /// Maximum display name length, in characters.
    pub name_max_len: usize,

    /// Maximum chat message length, in characters.
    pub chat_max_len: usize,

    /// Whether a seat may be reclaimed by display name alone, without
    /// the rejoin token. Only unambiguous names ever match.
    pub name_rejoin: bool,
}

impl GameConfig {
    /// Turn time in whole seconds, as reported to clients.
    pub fn time_limit_secs(&self) -> u64 {
        self.turn_time.as_secs()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 15,
            cols: 15,
            turn_time: Duration::from_secs(40),
            starting_lives: 2,
            min_players: 2,
            max_players: 8,
            ranking_size: 3,
            name_max_len: 20,
            chat_max_len: 300,
            name_rejoin: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!((config.rows, config.cols), (15, 15));
        assert_eq!(config.time_limit_secs(), 40);
        assert_eq!(config.starting_lives, 2);
        assert_eq!(config.min_players, 2);
        assert_eq!(config.ranking_size, 3);
        assert!(config.name_rejoin);
    }
}
