//! Creature effect handling
//!
//! When a trigger fires, the card's matching effects are turned into queued
//! actions. Each (card, trigger) pair fires at most once per resolution
//! chain, tracked by the queue's processed-effects ledger. That ledger is
//! what stops two retaliating creatures from damaging each other forever.

use crate::core::{CardId, EffectActionType, TargetRef, Trigger};
use crate::game::{GameAction, GameSession, LogCategory};
use smallvec::SmallVec;

impl GameSession {
    /// Queue the actions of every `trigger` effect on `card_id`
    ///
    /// During a pass the actions join the live queue one chain level deeper
    /// than the action that fired the trigger. Returns how many actions were
    /// accepted by the queue.
    pub fn handle_effect(&mut self, card_id: CardId, trigger: Trigger) -> usize {
        self.queue_effect_actions(card_id, trigger, None)
    }

    /// Like [`handle_effect`](GameSession::handle_effect), with an optional
    /// explicit target that replaces normal targeting for damage actions
    pub(crate) fn queue_effect_actions(
        &mut self,
        card_id: CardId,
        trigger: Trigger,
        explicit_target: Option<TargetRef>,
    ) -> usize {
        let Ok(card) = self.cards.get(card_id) else {
            self.logger.warn(
                LogCategory::Effect,
                format_args!("Cannot fire {trigger}: card {card_id} does not exist"),
            );
            return 0;
        };
        if !card.has_trigger(trigger) {
            return 0;
        }
        if self.queue.is_effect_processed(card_id, trigger) {
            self.logger.trace(
                LogCategory::Effect,
                format_args!("{} {trigger} already fired in this chain", card.name),
            );
            return 0;
        }
        let Some(controller) = card.owner else {
            self.logger.warn(
                LogCategory::Effect,
                format_args!("Cannot fire {trigger} for {}: card has no owner", card.name),
            );
            return 0;
        };

        // Thorns: damage taken from a known attacker is answered directly
        let retaliate_against = match trigger {
            Trigger::OnDamage => card.last_attacker,
            _ => None,
        };

        let mut planned: SmallVec<[GameAction; 4]> = SmallVec::new();
        for effect in card.effects_for(trigger) {
            for effect_action in &effect.actions {
                if effect_action.action_type != EffectActionType::Damage {
                    self.logger.trace(
                        LogCategory::Effect,
                        format_args!(
                            "{} {:?} effect is not supported, skipping",
                            card.name, effect_action.action_type
                        ),
                    );
                    continue;
                }

                let amount = effect_action.value;
                if let Some(attacker) = retaliate_against {
                    planned.push(GameAction::DirectDamage {
                        target: attacker,
                        amount,
                        source: Some(card_id),
                    });
                    continue;
                }

                let targets = match explicit_target {
                    Some(target) => SmallVec::from_slice(&[target]),
                    None => self.get_valid_targets(controller, effect_action.target_type),
                };
                for target in targets {
                    match target {
                        TargetRef::Player(player) => planned.push(GameAction::DamagePlayer {
                            target: player,
                            amount,
                        }),
                        TargetRef::Creature(creature) => planned.push(GameAction::DirectDamage {
                            target: creature,
                            amount,
                            source: Some(card_id),
                        }),
                        TargetRef::Slot { player, index } => {
                            let occupant = self
                                .get_player(player)
                                .ok()
                                .and_then(|p| p.battlefield.occupant(index));
                            if let Some(creature) = occupant {
                                planned.push(GameAction::DirectDamage {
                                    target: creature,
                                    amount,
                                    source: Some(card_id),
                                });
                            }
                        }
                    }
                }
            }
        }

        self.logger.trace(
            LogCategory::Effect,
            format_args!(
                "{} fires {trigger}: {} action(s)",
                card.name,
                planned.len()
            ),
        );

        let mut accepted = 0;
        for action in planned {
            if !self.add_triggered_action(action).is_dropped() {
                accepted += 1;
            }
        }
        self.queue.mark_effect_processed(card_id, trigger);
        accepted
    }
}
