//! Game actions and their execution
//!
//! A [`GameAction`] is an immutable command describing one game mutation.
//! Actions are queued on the session's [`ActionsQueue`](crate::game::ActionsQueue)
//! and executed in priority order by [`GameSession::resolve_actions`].

use crate::core::{CardId, PlayerId, TargetRef, Trigger};
use crate::game::{GameEvent, GameSession, LogCategory, VerbosityLevel};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution priority; lower values resolve first
pub type Priority = i8;

/// Types of game actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Put a creature onto its owner's battlefield
    Summon {
        creature: CardId,
        owner: PlayerId,
        /// Specific slot, or the first empty one
        slot: Option<usize>,
    },

    /// Remove health from a player
    DamagePlayer { target: PlayerId, amount: i32 },

    /// Weather-adjusted damage to a creature
    DamageCreature {
        target: CardId,
        amount: i32,
        attacker: Option<CardId>,
        is_direct_damage: bool,
    },

    /// Effect damage to a creature, using the direct-damage weather branch
    DirectDamage {
        target: CardId,
        amount: i32,
        source: Option<CardId>,
    },

    /// Exchange the slots of two creatures on one battlefield
    Swap {
        creature_a: CardId,
        creature_b: CardId,
        slot_a: usize,
        slot_b: usize,
        owner: PlayerId,
    },

    /// Relocate a creature, swapping if the destination is occupied
    Move {
        creature: CardId,
        from_slot: usize,
        to_slot: usize,
        player: PlayerId,
    },

    /// Declare an attack; the damage target is decided at execution time
    MarkCombatTarget {
        attacker: CardId,
        defender: PlayerId,
        target_slot: usize,
    },

    /// Play a card from hand
    PlayCard {
        card: CardId,
        owner: PlayerId,
        target: Option<TargetRef>,
    },
}

impl GameAction {
    pub const SUMMON_PRIORITY: Priority = -1;
    pub const MOVEMENT_PRIORITY: Priority = 0;
    pub const PLAY_CARD_PRIORITY: Priority = 1;
    pub const DIRECT_DAMAGE_PRIORITY: Priority = 2;
    pub const COMBAT_MARK_PRIORITY: Priority = 3;
    pub const DAMAGE_PRIORITY: Priority = 4;

    /// Where this action sorts in the queue
    ///
    /// Summons resolve before any damage, movement before combat marking,
    /// and direct (effect) damage before standard combat damage.
    pub fn priority(&self) -> Priority {
        match self {
            GameAction::Summon { .. } => Self::SUMMON_PRIORITY,
            GameAction::Move { .. } | GameAction::Swap { .. } => Self::MOVEMENT_PRIORITY,
            GameAction::PlayCard { .. } => Self::PLAY_CARD_PRIORITY,
            GameAction::DirectDamage { .. } => Self::DIRECT_DAMAGE_PRIORITY,
            GameAction::MarkCombatTarget { .. } => Self::COMBAT_MARK_PRIORITY,
            GameAction::DamageCreature { .. } | GameAction::DamagePlayer { .. } => {
                Self::DAMAGE_PRIORITY
            }
        }
    }

    /// The creature this action is queued on behalf of, if creature-keyed
    ///
    /// A newer creature-keyed action replaces an older pending one for the
    /// same creature.
    pub fn creature_key(&self) -> Option<CardId> {
        match self {
            GameAction::DamageCreature { attacker, .. } => *attacker,
            GameAction::Swap { creature_a, .. } => Some(*creature_a),
            GameAction::MarkCombatTarget { attacker, .. } => Some(*attacker),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GameAction::Summon { .. } => "Summon",
            GameAction::DamagePlayer { .. } => "DamagePlayer",
            GameAction::DamageCreature { .. } => "DamageCreature",
            GameAction::DirectDamage { .. } => "DirectDamage",
            GameAction::Swap { .. } => "Swap",
            GameAction::Move { .. } => "Move",
            GameAction::MarkCombatTarget { .. } => "MarkCombatTarget",
            GameAction::PlayCard { .. } => "PlayCard",
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameAction::Summon {
                creature,
                owner,
                slot,
            } => match slot {
                Some(slot) => write!(f, "Summon({creature} -> player {owner} slot {slot})"),
                None => write!(f, "Summon({creature} -> player {owner})"),
            },
            GameAction::DamagePlayer { target, amount } => {
                write!(f, "DamagePlayer({target}, {amount})")
            }
            GameAction::DamageCreature {
                target,
                amount,
                attacker,
                ..
            } => match attacker {
                Some(attacker) => write!(f, "DamageCreature({target}, {amount}, by {attacker})"),
                None => write!(f, "DamageCreature({target}, {amount})"),
            },
            GameAction::DirectDamage {
                target,
                amount,
                source,
            } => match source {
                Some(source) => write!(f, "DirectDamage({target}, {amount}, from {source})"),
                None => write!(f, "DirectDamage({target}, {amount})"),
            },
            GameAction::Swap {
                creature_a,
                creature_b,
                slot_a,
                slot_b,
                ..
            } => write!(f, "Swap({creature_a}@{slot_a}, {creature_b}@{slot_b})"),
            GameAction::Move {
                creature,
                from_slot,
                to_slot,
                ..
            } => write!(f, "Move({creature}, {from_slot} -> {to_slot})"),
            GameAction::MarkCombatTarget {
                attacker,
                defender,
                target_slot,
            } => write!(
                f,
                "MarkCombatTarget({attacker} -> player {defender} slot {target_slot})"
            ),
            GameAction::PlayCard { card, owner, .. } => {
                write!(f, "PlayCard({card} by player {owner})")
            }
        }
    }
}

impl GameSession {
    /// Execute a single action against the current board
    ///
    /// Expected failures (missing entities, occupied slots) come back as
    /// errors; the resolution loop logs them and moves on.
    pub(crate) fn execute_action(&mut self, action: GameAction) -> Result<()> {
        match action {
            GameAction::Summon {
                creature,
                owner,
                slot,
            } => self.execute_summon(creature, owner, slot),
            GameAction::DamagePlayer { target, amount } => self.execute_damage_player(target, amount),
            GameAction::DamageCreature {
                target,
                amount,
                attacker,
                is_direct_damage,
            } => self.damage_creature(target, amount, attacker, is_direct_damage),
            GameAction::DirectDamage {
                target,
                amount,
                source,
            } => self.damage_creature(target, amount, source, true),
            GameAction::Swap {
                creature_a,
                creature_b,
                slot_a,
                slot_b,
                owner,
            } => self.execute_swap(creature_a, creature_b, slot_a, slot_b, owner),
            GameAction::Move {
                creature,
                from_slot,
                to_slot,
                player,
            } => self.execute_move(creature, from_slot, to_slot, player),
            GameAction::MarkCombatTarget {
                attacker,
                defender,
                target_slot,
            } => self.execute_mark_combat_target(attacker, defender, target_slot),
            GameAction::PlayCard {
                card,
                owner,
                target,
            } => self.execute_play_card(card, owner, target),
        }
    }

    fn execute_summon(&mut self, creature: CardId, owner: PlayerId, slot: Option<usize>) -> Result<()> {
        let card = self.cards.get(creature)?;
        if !card.is_creature() {
            return Err(DuelError::InvalidAction(format!(
                "{} is not a creature and cannot be summoned",
                card.name
            )));
        }
        if card.is_dead {
            return Err(DuelError::InvalidAction(format!(
                "{} is dead and cannot be summoned",
                card.name
            )));
        }
        if self.find_battlefield_slot(creature).is_some() {
            return Err(DuelError::InvalidAction(format!(
                "{} is already on the battlefield",
                card.name
            )));
        }

        // Check placement before any side effects so a full board leaves no trace
        let field = &self.get_player(owner)?.battlefield;
        match slot {
            Some(index) => {
                let slot = field.slot(index).ok_or(DuelError::InvalidSlot(index))?;
                if let Some(occupant) = slot.occupant {
                    return Err(DuelError::SlotOccupied {
                        index,
                        occupant: occupant.as_u32(),
                    });
                }
            }
            None => {
                if field.is_full() {
                    return Err(DuelError::BattlefieldFull(owner.as_u32()));
                }
            }
        }

        // OnPlay effects only queue here; none of them run before placement
        self.cards.get_mut(creature)?.owner = Some(owner);
        self.handle_effect(creature, Trigger::OnPlay);

        let field = &mut self.get_player_mut(owner)?.battlefield;
        let index = match slot {
            Some(index) => {
                field.place(creature, index)?;
                index
            }
            None => field.place_first_empty(creature)?,
        };
        self.logger.trace(
            LogCategory::Action,
            format_args!("Summoned {creature} into slot {index} for player {owner}"),
        );
        self.events.emit(GameEvent::GameStateChanged);
        Ok(())
    }

    fn execute_damage_player(&mut self, target: PlayerId, amount: i32) -> Result<()> {
        let player = self.get_player_mut(target)?;
        let dealt = player.take_damage(amount);
        let defeated = player.is_defeated();
        let name = player.name.clone();

        self.logger.trace(
            LogCategory::Action,
            format_args!("{name} takes {dealt} damage"),
        );
        self.events.emit(GameEvent::PlayerDamaged {
            player: target,
            amount: dealt,
        });
        if defeated && dealt > 0 {
            self.logger.log_fmt(
                VerbosityLevel::Minimal,
                None,
                format_args!("{name} has been defeated"),
            );
        }
        Ok(())
    }

    /// Apply weather-adjusted damage to a creature
    pub(crate) fn damage_creature(
        &mut self,
        target: CardId,
        base_amount: i32,
        attacker: Option<CardId>,
        is_direct_damage: bool,
    ) -> Result<()> {
        let modifier = self.weather.damage_modifier(is_direct_damage);
        let amount = base_amount.saturating_add(modifier).max(0);
        if modifier != 0 {
            self.logger.trace(
                LogCategory::Weather,
                format_args!(
                    "{} weather adjusts damage to {target}: {base_amount} -> {amount}",
                    self.weather.current()
                ),
            );
        }
        self.apply_creature_damage(target, amount, attacker)
    }

    /// Apply already-adjusted damage, then handle death and triggers
    ///
    /// The attacker is recorded on the target for the duration of the
    /// OnDamage trigger so that retaliation effects can find it.
    pub(crate) fn apply_creature_damage(
        &mut self,
        target: CardId,
        amount: i32,
        attacker: Option<CardId>,
    ) -> Result<()> {
        if self.find_battlefield_slot(target).is_none() {
            return Err(DuelError::InvalidAction(format!(
                "creature {target} is not on any battlefield"
            )));
        }
        let card = self.cards.get_mut(target)?;
        if card.is_dead {
            return Err(DuelError::InvalidAction(format!(
                "{} is already dead",
                card.name
            )));
        }

        card.last_attacker = attacker;
        let outcome = card.apply_damage(amount);
        self.logger.trace(
            LogCategory::Action,
            format_args!("Creature {target} takes {} damage", outcome.dealt),
        );
        self.events.emit(GameEvent::CreatureDamaged {
            card: target,
            amount: outcome.dealt,
        });

        if outcome.died {
            self.handle_creature_death(target)?;
        }
        if outcome.dealt > 0 {
            self.handle_effect(target, Trigger::OnDamage);
        }
        self.cards.get_mut(target)?.last_attacker = None;
        if outcome.died {
            self.handle_effect(target, Trigger::OnDeath);
        }
        Ok(())
    }

    /// Take a dead creature off the board and into its owner's graveyard
    fn handle_creature_death(&mut self, card_id: CardId) -> Result<()> {
        if let Some((player_id, _)) = self.find_battlefield_slot(card_id) {
            let player = self.get_player_mut(player_id)?;
            player.battlefield.remove(card_id);
            player.zones.graveyard.add(card_id);
        }
        let name = self.cards.get(card_id)?.name.clone();
        self.logger.log_fmt(
            VerbosityLevel::Normal,
            Some(LogCategory::Action),
            format_args!("{name} dies"),
        );
        self.events.emit(GameEvent::CreatureDied { card: card_id });
        self.events.emit(GameEvent::GameStateChanged);
        Ok(())
    }

    fn execute_swap(
        &mut self,
        creature_a: CardId,
        creature_b: CardId,
        slot_a: usize,
        slot_b: usize,
        owner: PlayerId,
    ) -> Result<()> {
        let field = &mut self.get_player_mut(owner)?.battlefield;
        if field.occupant(slot_a) != Some(creature_a) {
            return Err(DuelError::InvalidAction(format!(
                "creature {creature_a} is not in slot {slot_a}"
            )));
        }
        if field.occupant(slot_b) != Some(creature_b) {
            return Err(DuelError::InvalidAction(format!(
                "creature {creature_b} is not in slot {slot_b}"
            )));
        }

        field.remove(creature_a);
        field.remove(creature_b);
        field.place(creature_a, slot_b)?;
        field.place(creature_b, slot_a)?;

        self.logger.trace(
            LogCategory::Action,
            format_args!("Swapped {creature_a} and {creature_b}"),
        );
        self.events.emit(GameEvent::GameStateChanged);
        Ok(())
    }

    fn execute_move(
        &mut self,
        creature: CardId,
        from_slot: usize,
        to_slot: usize,
        player: PlayerId,
    ) -> Result<()> {
        let field = &mut self.get_player_mut(player)?.battlefield;
        if field.occupant(from_slot) != Some(creature) {
            return Err(DuelError::InvalidAction(format!(
                "creature {creature} is not in slot {from_slot}"
            )));
        }
        if from_slot == to_slot {
            return Ok(());
        }
        if field.slot(to_slot).is_none() {
            return Err(DuelError::InvalidSlot(to_slot));
        }

        if let Some(other) = field.occupant(to_slot) {
            return self.execute_swap(creature, other, from_slot, to_slot, player);
        }

        field.remove(creature);
        field.place(creature, to_slot)?;
        self.logger.trace(
            LogCategory::Action,
            format_args!("Moved {creature} from slot {from_slot} to {to_slot}"),
        );
        self.events.emit(GameEvent::GameStateChanged);
        Ok(())
    }

    /// Turn an attack declaration into damage against whatever is in the
    /// target slot right now
    fn execute_mark_combat_target(
        &mut self,
        attacker: CardId,
        defender: PlayerId,
        target_slot: usize,
    ) -> Result<()> {
        let attack = {
            let card = self.cards.get(attacker)?;
            if card.is_dead || self.find_battlefield_slot(attacker).is_none() {
                return Err(DuelError::InvalidAction(format!(
                    "attacker {} is no longer on the battlefield",
                    card.name
                )));
            }
            card.attack
        };

        let field = &self.get_player(defender)?.battlefield;
        if field.slot(target_slot).is_none() {
            return Err(DuelError::InvalidSlot(target_slot));
        }

        let follow_up = match field.occupant(target_slot) {
            Some(occupant) => GameAction::DamageCreature {
                target: occupant,
                amount: attack,
                attacker: Some(attacker),
                is_direct_damage: false,
            },
            None => GameAction::DamagePlayer {
                target: defender,
                amount: attack,
            },
        };
        self.logger.trace(
            LogCategory::Combat,
            format_args!("Attack by {attacker} resolves to {follow_up}"),
        );
        self.add_action(follow_up);
        Ok(())
    }

    fn execute_play_card(
        &mut self,
        card_id: CardId,
        owner: PlayerId,
        target: Option<TargetRef>,
    ) -> Result<()> {
        let player = self.get_player_mut(owner)?;
        if !player.zones.hand.remove(card_id) {
            return Err(DuelError::InvalidAction(format!(
                "card {card_id} is not in player {owner}'s hand"
            )));
        }

        let card = self.cards.get_mut(card_id)?;
        card.owner = Some(owner);
        if card.is_creature() {
            let slot = match target {
                Some(TargetRef::Slot { player, index }) if player == owner => Some(index),
                _ => None,
            };
            self.add_action(GameAction::Summon {
                creature: card_id,
                owner,
                slot,
            });
        } else {
            // Non-creature cards resolve their play effects and are discarded
            self.queue_effect_actions(card_id, Trigger::OnPlay, target);
            self.get_player_mut(owner)?.zones.graveyard.add(card_id);
        }
        Ok(())
    }
}
