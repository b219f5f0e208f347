//! Random AI controller for testing and baseline gameplay
//!
//! Picks uniformly among the offered actions and occasionally passes.

use crate::core::PlayerId;
use crate::game::controller::{GameStateView, PlayerAction, PlayerController};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// A controller that makes random choices
pub struct RandomController {
    player_id: PlayerId,
    rng: ChaCha12Rng,
}

impl RandomController {
    /// Seeded from OS entropy
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::from_entropy(),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerController for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn choose_action(
        &mut self,
        _view: &GameStateView,
        available_actions: &[PlayerAction],
    ) -> Option<PlayerAction> {
        if available_actions.is_empty() {
            return None;
        }
        // One extra slot stands for passing
        let index = self.rng.gen_range(0..=available_actions.len());
        available_actions.get(index).copied()
    }
}
