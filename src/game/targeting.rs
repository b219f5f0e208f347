//! Effect target selection

use crate::core::{PlayerId, Target, TargetRef, TargetType};
use crate::game::GameSession;
use smallvec::SmallVec;

/// Targets selected for one effect action, in board order
pub type TargetList = SmallVec<[TargetRef; 8]>;

impl GameSession {
    /// Resolve `target_type` relative to `controller`
    ///
    /// Deterministic for a given board: the controller's creatures come
    /// before the opponent's, each in slot order. Creatures that are no
    /// longer valid targets are skipped.
    pub fn get_valid_targets(&self, controller: PlayerId, target_type: TargetType) -> TargetList {
        let mut targets = TargetList::new();
        let opponent = self.opponent_of(controller);

        match target_type {
            TargetType::Player => targets.push(TargetRef::Player(controller)),
            TargetType::Enemy => {
                if let Some(opponent) = opponent {
                    targets.push(TargetRef::Player(opponent));
                }
            }
            TargetType::AllCreatures => {
                self.push_creature_targets(controller, controller, &mut targets);
                if let Some(opponent) = opponent {
                    self.push_creature_targets(opponent, controller, &mut targets);
                }
            }
            TargetType::FriendlyCreatures => {
                self.push_creature_targets(controller, controller, &mut targets)
            }
            TargetType::EnemyCreatures => {
                if let Some(opponent) = opponent {
                    self.push_creature_targets(opponent, controller, &mut targets);
                }
            }
        }
        targets
    }

    fn push_creature_targets(&self, side: PlayerId, controller: PlayerId, out: &mut TargetList) {
        let Ok(player) = self.get_player(side) else {
            return;
        };
        for card_id in player.battlefield.creatures() {
            if let Ok(card) = self.cards.get(card_id) {
                if card.is_valid_target(Some(controller)) {
                    out.push(card.target_ref());
                }
            }
        }
    }
}
