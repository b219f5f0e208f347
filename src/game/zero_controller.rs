//! Zero controller for testing and automation
//!
//! Always chooses the first available action. Games run with it are fully
//! deterministic and need no input.

use crate::core::PlayerId;
use crate::game::controller::{GameStateView, PlayerAction, PlayerController};

/// A controller that always chooses the first available action (index 0)
pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }
}

impl PlayerController for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn choose_action(
        &mut self,
        _view: &GameStateView,
        available_actions: &[PlayerAction],
    ) -> Option<PlayerAction> {
        available_actions.first().copied()
    }
}
