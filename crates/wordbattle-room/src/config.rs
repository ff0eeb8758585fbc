//! Room configuration.

use serde::{Deserialize, Serialize};
use wordbattle_core::GameConfig;

/// Settings for every room a [`RoomManager`](crate::RoomManager) spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Capacity of each room actor's command channel. When it fills up,
    /// senders wait.
    pub channel_size: usize,

    /// Length of generated room codes.
    pub code_len: usize,

    /// Rules for the game played in each room.
    pub game: GameConfig,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            code_len: 6,
            game: GameConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.channel_size, 64);
        assert_eq!(config.code_len, 6);
        assert_eq!(config.game.max_players, 8);
    }
}
