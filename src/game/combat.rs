//! Combat declarations
//!
//! Tracks which creatures have attacked during the current resolution round
//! and which slot each one targeted. Damage itself is produced later by the
//! queued `MarkCombatTarget` actions.

use crate::core::{CardId, PlayerId, TargetRef};
use crate::game::{GameAction, GameSession, LogCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attack declarations for the current round
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatHandler {
    /// Attacker -> declared target slot
    attacks: BTreeMap<CardId, TargetRef>,
}

impl CombatHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_attacked(&self, attacker: CardId) -> bool {
        self.attacks.contains_key(&attacker)
    }

    pub fn declared_target(&self, attacker: CardId) -> Option<TargetRef> {
        self.attacks.get(&attacker).copied()
    }

    /// Record an attack. Returns false if this creature already attacked.
    pub fn register_attack(&mut self, attacker: CardId, defender: PlayerId, slot: usize) -> bool {
        if self.has_attacked(attacker) {
            return false;
        }
        self.attacks.insert(
            attacker,
            TargetRef::Slot {
                player: defender,
                index: slot,
            },
        );
        true
    }

    pub fn attackers(&self) -> Vec<CardId> {
        self.attacks.keys().copied().collect()
    }

    /// Forget all declarations (end of every resolution pass)
    pub fn reset_round(&mut self) {
        self.attacks.clear();
    }
}

impl GameSession {
    /// Declare that `attacker` attacks slot `target_slot` of `defender`
    ///
    /// Rejected (logged, nothing queued) when either side does not exist,
    /// the attacker is not on its owner's battlefield, the target is not the
    /// attacker's opponent, or the attacker already attacked this round.
    /// Returns whether the attack was queued.
    pub fn handle_creature_combat(
        &mut self,
        attacker: CardId,
        defender: PlayerId,
        target_slot: usize,
    ) -> bool {
        let Ok(card) = self.cards.get(attacker) else {
            self.logger.warn(
                LogCategory::Combat,
                format_args!("Attack rejected: attacker {attacker} does not exist"),
            );
            return false;
        };
        let Some((owner, _)) = self.find_battlefield_slot(attacker) else {
            self.logger.warn(
                LogCategory::Combat,
                format_args!("Attack rejected: {} is not on the battlefield", card.name),
            );
            return false;
        };
        let Ok(defending) = self.get_player(defender) else {
            self.logger.warn(
                LogCategory::Combat,
                format_args!("Attack rejected: defending player {defender} does not exist"),
            );
            return false;
        };
        if defending.opponent != Some(owner) {
            self.logger.warn(
                LogCategory::Combat,
                format_args!("Attack rejected: {} cannot attack its own side", card.name),
            );
            return false;
        }
        if defending.battlefield.slot(target_slot).is_none() {
            self.logger.warn(
                LogCategory::Combat,
                format_args!("Attack rejected: slot {target_slot} does not exist"),
            );
            return false;
        }
        if !self.combat.register_attack(attacker, defender, target_slot) {
            self.logger.warn(
                LogCategory::Combat,
                format_args!("Attack rejected: {attacker} has already attacked this round"),
            );
            return false;
        }

        self.logger.trace(
            LogCategory::Combat,
            format_args!("Creature {attacker} attacks slot {target_slot} of player {defender}"),
        );
        !self
            .add_action(GameAction::MarkCombatTarget {
                attacker,
                defender,
                target_slot,
            })
            .is_dropped()
    }
}
