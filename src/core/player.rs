//! Player representation

use crate::core::{GameEntity, PlayerId, PlayerName, Target, TargetRef};
use crate::zones::{Battlefield, PlayerZones};
use serde::{Deserialize, Serialize};

/// Represents a player in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique ID for this player
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Health total, never negative
    pub health: i32,

    /// Starting health
    pub max_health: i32,

    /// Set reciprocally when the session is created
    pub opponent: Option<PlayerId>,

    /// Library, hand and graveyard
    pub zones: PlayerZones,

    /// Fixed-capacity creature slots
    pub battlefield: Battlefield,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<PlayerName>,
        starting_health: i32,
        battlefield_slots: usize,
    ) -> Self {
        Player {
            id,
            name: name.into(),
            health: starting_health,
            max_health: starting_health,
            opponent: None,
            zones: PlayerZones::new(id),
            battlefield: Battlefield::new(id, battlefield_slots),
        }
    }

    /// Remove health, floored at 0. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).max(0);
        before - self.health
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl Target for Player {
    fn target_ref(&self) -> TargetRef {
        TargetRef::Player(self.id)
    }

    fn is_valid_target(&self, _controller: Option<PlayerId>) -> bool {
        !self.is_defeated()
    }
}
