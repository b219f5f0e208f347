//! Card types and definitions

use crate::core::{
    CardEffect, CardId, CardName, EffectType, GameEntity, PlayerId, Target, TargetRef, Trigger,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    /// Summoned onto the battlefield when played
    Creature,
    /// Resolves its OnPlay effects and goes to the graveyard
    Spell,
}

/// Result of applying damage to a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    /// Health actually removed
    pub dealt: i32,
    /// True only on the application that took the creature to 0
    pub died: bool,
}

/// Represents a card instance during gameplay
///
/// Creature cards carry attack and health and are the battle entities of the
/// game. Many instances can share one card definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID for this card instance
    pub id: CardId,

    pub name: CardName,

    pub card_type: CardType,

    pub attack: i32,

    /// Current health, never negative
    pub health: i32,

    /// Printed health
    pub max_health: i32,

    /// Effects in declaration order
    pub effects: SmallVec<[CardEffect; 2]>,

    /// Controlling player; None until the card is dealt to a player
    pub owner: Option<PlayerId>,

    /// Set once when health reaches 0
    pub is_dead: bool,

    /// Attacker of the damage currently being applied (retaliation bookkeeping)
    #[serde(skip)]
    pub last_attacker: Option<CardId>,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<CardName>, card_type: CardType) -> Self {
        Card {
            id,
            name: name.into(),
            card_type,
            attack: 0,
            health: 0,
            max_health: 0,
            effects: SmallVec::new(),
            owner: None,
            is_dead: false,
            last_attacker: None,
        }
    }

    pub fn new_creature(id: CardId, name: impl Into<CardName>, attack: i32, health: i32) -> Self {
        let mut card = Card::new(id, name, CardType::Creature);
        card.attack = attack;
        card.health = health.max(0);
        card.max_health = card.health;
        card
    }

    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_creature(&self) -> bool {
        self.card_type == CardType::Creature
    }

    /// Effects that respond to `trigger`, in declaration order
    ///
    /// Continuous effects are never fired by events.
    pub fn effects_for(&self, trigger: Trigger) -> impl Iterator<Item = &CardEffect> {
        self.effects
            .iter()
            .filter(move |e| e.trigger == trigger && e.effect_type != EffectType::Continuous)
    }

    pub fn has_trigger(&self, trigger: Trigger) -> bool {
        self.effects_for(trigger).next().is_some()
    }

    /// Remove health, clamping at 0
    ///
    /// Negative amounts are treated as 0 so damage never heals. Damage to a
    /// creature that is already dead is ignored, so `died` is reported at
    /// most once per creature.
    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_dead {
            return DamageOutcome::default();
        }
        let amount = amount.max(0);
        let before = self.health;
        self.health = (self.health - amount).max(0);
        let died = self.health == 0 && self.is_creature();
        if died {
            self.is_dead = true;
        }
        DamageOutcome {
            dealt: before - self.health,
            died,
        }
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl Target for Card {
    fn target_ref(&self) -> TargetRef {
        TargetRef::Creature(self.id)
    }

    fn is_valid_target(&self, _controller: Option<PlayerId>) -> bool {
        self.is_creature() && !self.is_dead && self.health > 0
    }
}
