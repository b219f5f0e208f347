//! Card file loader (.txt format)
//!
//! One card per file, `Key:Value` lines:
//!
//! ```text
//! Name:Thornback Toad
//! Types:Creature
//! PT:2/5
//! E:Triggered|OnDamage|Damage:2:Enemy
//! ```
//!
//! An `E:` line is `<EffectType>|<Trigger>|<Action>[,<Action>...]` where each
//! action is `<ActionType>:<value>:<TargetType>`.

use crate::core::{
    Card, CardEffect, CardId, CardName, CardType, EffectAction, EffectActionType, EffectType,
    TargetType, Trigger,
};
use crate::{DuelError, Result};
use smallvec::SmallVec;
use std::fs;
use std::path::Path;

/// Card loader for .txt files
pub struct CardLoader;

impl CardLoader {
    pub fn load_from_file(path: &Path) -> Result<CardDefinition> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a card from its text content
    pub fn parse(content: &str) -> Result<CardDefinition> {
        let mut name = None;
        let mut card_type = None;
        let mut attack = 0;
        let mut health = 0;
        let mut effects = SmallVec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "Name" => name = Some(CardName::new(value)),
                "Types" => {
                    card_type = Some(match value {
                        "Creature" => CardType::Creature,
                        "Spell" => CardType::Spell,
                        other => {
                            return Err(DuelError::InvalidCardFormat(format!(
                                "unknown card type '{other}'"
                            )))
                        }
                    })
                }
                "PT" => {
                    let parsed = value
                        .split_once('/')
                        .and_then(|(a, h)| Some((a.trim().parse().ok()?, h.trim().parse().ok()?)));
                    let Some((a, h)) = parsed else {
                        return Err(DuelError::InvalidCardFormat(format!("bad PT '{value}'")));
                    };
                    attack = a;
                    health = h;
                }
                "E" => effects.push(parse_effect(value)?),
                _ => {} // Unknown keys are ignored
            }
        }

        let name = name.ok_or(DuelError::InvalidCardFormat("Missing card name".to_string()))?;
        let card_type = card_type
            .ok_or_else(|| DuelError::InvalidCardFormat(format!("{name}: missing Types")))?;
        if card_type == CardType::Creature && health <= 0 {
            return Err(DuelError::InvalidCardFormat(format!(
                "{name}: creatures need positive health"
            )));
        }

        Ok(CardDefinition {
            name,
            card_type,
            attack,
            health,
            effects,
        })
    }
}

fn parse_effect(value: &str) -> Result<CardEffect> {
    let mut parts = value.split('|');
    let (Some(effect_type), Some(trigger), Some(actions)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(DuelError::InvalidCardFormat(format!(
            "effect '{value}' needs <EffectType>|<Trigger>|<Actions>"
        )));
    };

    let effect_type = match effect_type.trim() {
        "Immediate" => EffectType::Immediate,
        "Triggered" => EffectType::Triggered,
        "Continuous" => EffectType::Continuous,
        other => return Err(bad_field("effect type", other)),
    };
    let trigger = match trigger.trim() {
        "OnPlay" => Trigger::OnPlay,
        "OnDeath" => Trigger::OnDeath,
        "OnDamage" => Trigger::OnDamage,
        "StartOfTurn" => Trigger::StartOfTurn,
        "EndOfTurn" => Trigger::EndOfTurn,
        other => return Err(bad_field("trigger", other)),
    };

    let mut effect = CardEffect::new(effect_type, trigger);
    for action in actions.split(',') {
        effect = effect.with_action(parse_action(action.trim())?);
    }
    Ok(effect)
}

fn parse_action(action: &str) -> Result<EffectAction> {
    let fields: SmallVec<[&str; 3]> = action.split(':').map(str::trim).collect();
    let [action_type, amount, target_type] = fields.as_slice() else {
        return Err(DuelError::InvalidCardFormat(format!(
            "action '{action}' needs <ActionType>:<value>:<TargetType>"
        )));
    };

    let action_type = match *action_type {
        "Damage" => EffectActionType::Damage,
        "Heal" => EffectActionType::Heal,
        "Draw" => EffectActionType::Draw,
        "Summon" => EffectActionType::Summon,
        other => return Err(bad_field("action type", other)),
    };
    let value = amount
        .parse()
        .map_err(|_| bad_field("action value", amount))?;
    let target_type = match *target_type {
        "Player" => TargetType::Player,
        "Enemy" => TargetType::Enemy,
        "AllCreatures" => TargetType::AllCreatures,
        "FriendlyCreatures" => TargetType::FriendlyCreatures,
        "EnemyCreatures" => TargetType::EnemyCreatures,
        other => return Err(bad_field("target type", other)),
    };
    Ok(EffectAction::new(action_type, value, target_type))
}

fn bad_field(what: &str, value: &str) -> DuelError {
    DuelError::InvalidCardFormat(format!("unknown {what} '{value}'"))
}

/// Card definition (not yet instantiated in a game)
#[derive(Debug, Clone, PartialEq)]
pub struct CardDefinition {
    pub name: CardName,
    pub card_type: CardType,
    pub attack: i32,
    pub health: i32,
    pub effects: SmallVec<[CardEffect; 2]>,
}

impl CardDefinition {
    /// Create a Card instance from this definition
    pub fn instantiate(&self, id: CardId) -> Card {
        let mut card = Card::new(id, self.name.clone(), self.card_type);
        if self.card_type == CardType::Creature {
            card.attack = self.attack;
            card.health = self.health;
            card.max_health = self.health;
        }
        card.effects = self.effects.clone();
        card
    }
}
