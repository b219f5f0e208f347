//! Core game types and entities

pub mod card;
pub mod effects;
pub mod entity;
pub mod player;
pub mod types;

pub use card::{Card, CardType, DamageOutcome};
pub use effects::{
    CardEffect, EffectAction, EffectActionType, EffectType, Target, TargetRef, TargetType, Trigger,
};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use player::Player;
pub use types::{CardName, PlayerName};

/// Card instance ID (creatures and spells)
pub type CardId = EntityId<Card>;

/// Player ID
pub type PlayerId = EntityId<Player>;
