//! Card effects and targeting primitives

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// How an effect is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Happens once when the card is played
    Immediate,
    /// Fires whenever its trigger event occurs
    Triggered,
    /// Always-on modifier (declared by card data, not evaluated by the engine)
    Continuous,
}

/// Named events that activate a card's effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Trigger {
    OnPlay,
    OnDeath,
    OnDamage,
    StartOfTurn,
    EndOfTurn,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trigger::OnPlay => "OnPlay",
            Trigger::OnDeath => "OnDeath",
            Trigger::OnDamage => "OnDamage",
            Trigger::StartOfTurn => "StartOfTurn",
            Trigger::EndOfTurn => "EndOfTurn",
        };
        write!(f, "{s}")
    }
}

/// What an effect action does
///
/// Only `Damage` produces queue entries. The others are declared by card
/// data and skipped (with a log line) during effect handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectActionType {
    Damage,
    Heal,
    Draw,
    Summon,
}

/// Which entities an effect action selects, relative to its controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    /// The controller only
    Player,
    /// The opposing player only
    Enemy,
    /// Every creature on both battlefields
    AllCreatures,
    /// Creatures on the controller's battlefield
    FriendlyCreatures,
    /// Creatures on the opponent's battlefield
    EnemyCreatures,
}

/// A single step of an effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectAction {
    pub action_type: EffectActionType,
    pub value: i32,
    pub target_type: TargetType,
}

impl EffectAction {
    pub fn new(action_type: EffectActionType, value: i32, target_type: TargetType) -> Self {
        EffectAction {
            action_type,
            value,
            target_type,
        }
    }

    /// Shorthand for the only action type the engine executes
    pub fn damage(value: i32, target_type: TargetType) -> Self {
        Self::new(EffectActionType::Damage, value, target_type)
    }
}

/// An effect declared on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEffect {
    pub effect_type: EffectType,
    pub trigger: Trigger,
    pub actions: SmallVec<[EffectAction; 2]>,
}

impl CardEffect {
    pub fn new(effect_type: EffectType, trigger: Trigger) -> Self {
        CardEffect {
            effect_type,
            trigger,
            actions: SmallVec::new(),
        }
    }

    /// Convenience constructor for a triggered effect
    pub fn triggered(trigger: Trigger, actions: impl IntoIterator<Item = EffectAction>) -> Self {
        CardEffect {
            effect_type: EffectType::Triggered,
            trigger,
            actions: actions.into_iter().collect(),
        }
    }

    pub fn with_action(mut self, action: EffectAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Anything an action can be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    Player(PlayerId),
    Creature(CardId),
    /// A battlefield position, identified by its owning player and index
    Slot { player: PlayerId, index: usize },
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Player(id) => write!(f, "player {id}"),
            TargetRef::Creature(id) => write!(f, "creature {id}"),
            TargetRef::Slot { player, index } => write!(f, "slot {index} of player {player}"),
        }
    }
}

/// Capability shared by everything addressable by an action
pub trait Target {
    /// Stable reference to this target
    fn target_ref(&self) -> TargetRef;

    /// Whether this is still a legal target. `controller` is the player
    /// choosing targets, when friend/foe matters.
    fn is_valid_target(&self, controller: Option<PlayerId>) -> bool;
}
