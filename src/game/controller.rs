//! Player controller trait and game state view
//!
//! The game loop calls the controller whenever a decision is needed. The
//! controller only sees a read-only view of the session.

use crate::core::{CardId, PlayerId};
use crate::game::{GameSession, Weather};
use crate::zones::Zone;

/// Choices offered to a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Play a card from hand
    PlayCard(CardId),

    /// Attack one slot of the opponent's battlefield
    Attack { attacker: CardId, slot: usize },
}

/// Read-only view of the session from one player's perspective
pub struct GameStateView<'a> {
    game: &'a GameSession,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a GameSession, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn opponent_id(&self) -> Option<PlayerId> {
        self.game.opponent_of(self.player_id)
    }

    /// Cards in this player's hand
    pub fn hand(&self) -> &[CardId] {
        self.game
            .get_player(self.player_id)
            .map(|p| p.zones.hand.cards.as_slice())
            .unwrap_or(&[])
    }

    /// This player's creatures in slot order
    pub fn battlefield(&self) -> Vec<CardId> {
        self.game
            .get_player(self.player_id)
            .map(|p| p.battlefield.creatures().collect())
            .unwrap_or_default()
    }

    /// Occupant of each opponent slot, in slot order
    pub fn opponent_slots(&self) -> Vec<Option<CardId>> {
        self.opponent_id()
            .and_then(|id| self.game.get_player(id).ok())
            .map(|p| p.battlefield.slots().iter().map(|s| s.occupant).collect())
            .unwrap_or_default()
    }

    pub fn is_card_in_zone(&self, card_id: CardId, zone: Zone) -> bool {
        let Ok(player) = self.game.get_player(self.player_id) else {
            return false;
        };
        match zone {
            Zone::Library => player.zones.library.contains(card_id),
            Zone::Hand => player.zones.hand.contains(card_id),
            Zone::Battlefield => player.battlefield.contains(card_id),
            Zone::Graveyard => player.zones.graveyard.contains(card_id),
        }
    }

    pub fn card_name(&self, card_id: CardId) -> Option<String> {
        self.game.cards.get(card_id).ok().map(|c| c.name.to_string())
    }

    pub fn is_creature(&self, card_id: CardId) -> bool {
        self.game
            .cards
            .get(card_id)
            .map(|c| c.is_creature())
            .unwrap_or(false)
    }

    /// (attack, health) of a card
    pub fn stats(&self, card_id: CardId) -> Option<(i32, i32)> {
        self.game
            .cards
            .get(card_id)
            .ok()
            .map(|c| (c.attack, c.health))
    }

    pub fn health(&self) -> i32 {
        self.game
            .get_player(self.player_id)
            .map(|p| p.health)
            .unwrap_or(0)
    }

    pub fn opponent_health(&self) -> i32 {
        self.opponent_id()
            .and_then(|id| self.game.get_player(id).ok())
            .map(|p| p.health)
            .unwrap_or(0)
    }

    pub fn weather(&self) -> Weather {
        self.game.weather.current()
    }
}

/// Decision maker for one player
pub trait PlayerController {
    fn player_id(&self) -> PlayerId;

    /// Pick one of `available_actions`, or None to pass
    fn choose_action(
        &mut self,
        view: &GameStateView,
        available_actions: &[PlayerAction],
    ) -> Option<PlayerAction>;

    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}
