//! Game initialization from decks

use crate::core::PlayerId;
use crate::game::{GameSession, SessionConfig};
use crate::loader::{CardDatabase, DeckList};
use crate::{DuelError, Result};

/// Builds a ready-to-play session from two deck lists
pub struct GameInitializer<'a> {
    card_db: &'a CardDatabase,
}

impl<'a> GameInitializer<'a> {
    pub fn new(card_db: &'a CardDatabase) -> Self {
        GameInitializer { card_db }
    }

    /// Create a two-player session: fill and shuffle both libraries, then
    /// draw the starting hands
    pub fn init_game(
        &self,
        player1_name: &str,
        player1_deck: &DeckList,
        player2_name: &str,
        player2_deck: &DeckList,
        config: SessionConfig,
        seed: u64,
    ) -> Result<GameSession> {
        let hand_size = config.starting_hand_size;
        let mut game = GameSession::new_two_player(player1_name, player2_name, config);
        game.seed_rng(seed);

        let player_ids: Vec<PlayerId> = game.players.iter().map(|p| p.id).collect();
        for (player_id, deck) in player_ids.iter().zip([player1_deck, player2_deck]) {
            self.load_deck_into_game(&mut game, *player_id, deck)?;
            game.shuffle_library(*player_id)?;
        }
        for player_id in player_ids {
            for _ in 0..hand_size {
                game.draw_card(player_id)?;
            }
        }
        Ok(game)
    }

    fn load_deck_into_game(
        &self,
        game: &mut GameSession,
        player_id: PlayerId,
        deck: &DeckList,
    ) -> Result<()> {
        for entry in &deck.entries {
            let card_def = self.card_db.get_card(&entry.card_name).ok_or_else(|| {
                DuelError::InvalidDeckFormat(format!(
                    "Card not found in database: {}",
                    entry.card_name
                ))
            })?;

            for _ in 0..entry.count {
                let card_id = game.create_card(|id| card_def.instantiate(id));
                game.cards.get_mut(card_id)?.owner = Some(player_id);
                game.get_player_mut(player_id)?.zones.library.add(card_id);
            }
        }
        Ok(())
    }
}
