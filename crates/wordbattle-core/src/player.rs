//! Per-player game state.

use wordbattle_protocol::{PlayerId, PlayerStanding, PlayerSummary};

/// One seat at the table.
///
/// The seat outlives connections: on rejoin only `id` changes, score and
/// lives carry over.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    score: u32,
    lives: u8,
    max_lives: u8,
    active: bool,
    used_revive: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, lives: u8) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            lives,
            max_lives: lives,
            active: lives > 0,
            used_revive: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_used_revive(&self) -> bool {
        self.used_revive
    }

    /// Takes one life. The player goes inactive exactly when lives hit
    /// zero; losing a life while inactive does nothing.
    pub fn lose_life(&mut self) {
        if !self.active {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.active = false;
        }
    }

    /// A revive is only offered on the brink: active, one life left, and
    /// never revived before.
    pub fn can_use_revive(&self) -> bool {
        self.active && self.lives == 1 && !self.used_revive
    }

    /// Restores full lives and burns the one-shot revive.
    ///
    /// Returns `false` and changes nothing when [`can_use_revive`] does not
    /// hold.
    ///
    /// [`can_use_revive`]: Self::can_use_revive
    pub fn reset_lives(&mut self) -> bool {
        if !self.can_use_revive() {
            return false;
        }
        self.lives = self.max_lives;
        self.used_revive = true;
        true
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Moves the seat to a new connection identity.
    pub fn rebind(&mut self, id: PlayerId) {
        self.id = id;
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }

    pub fn standing(&self) -> PlayerStanding {
        PlayerStanding {
            id: self.id,
            name: self.name.clone(),
            score: self.score,
            lives: self.lives,
            is_active: self.active,
        }
    }
}
