//! Game loop implementation
//!
//! Drives turns: draw, start-of-turn triggers, playing cards, attacks,
//! end-of-turn triggers. Every phase ends by resolving the action queue.

use crate::core::{CardId, PlayerId, Trigger};
use crate::game::controller::{GameStateView, PlayerAction, PlayerController};
use crate::game::{GameAction, GameSession, LogCategory, Weather};
use crate::Result;
use rand::Rng;
use serde::Serialize;

/// Verbosity level for game output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, weather, rejected actions (default)
    #[default]
    Normal = 2,
    /// Verbose - every queued and resolved action
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Winner of the game (None on a draw or turn limit)
    pub winner: Option<PlayerId>,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

/// Reason the game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEndReason {
    /// The given player's health reached 0
    PlayerDeath(PlayerId),
    /// Game reached maximum turn limit
    TurnLimit,
    /// Both players fell in the same resolution
    Draw,
    /// Bounded run finished before the game did
    Manual,
}

/// Game loop manager
pub struct GameLoop<'a> {
    pub game: &'a mut GameSession,
    max_turns: u32,
    turns_elapsed: u32,
    /// Cached from game.logger
    pub verbosity: VerbosityLevel,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameSession) -> Self {
        let verbosity = game.logger.verbosity();
        let max_turns = game.config.max_turns;
        GameLoop {
            game,
            max_turns,
            turns_elapsed: 0,
            verbosity,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set verbosity on both the loop and the session's logger
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    pub fn turns_elapsed(&self) -> u32 {
        self.turns_elapsed
    }

    /// Run the game loop with the given player controllers
    ///
    /// Returns when a player is defeated or the turn limit is reached.
    pub fn run_game(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
    ) -> Result<GameResult> {
        loop {
            if let Some(result) = self.run_turn_once(controller1, controller2)? {
                self.notify_game_end(controller1, controller2, result.winner);
                return Ok(result);
            }
        }
    }

    /// Run up to `turns_to_run` turns, stopping early if the game ends
    ///
    /// Returns `GameEndReason::Manual` if all turns completed without an end.
    pub fn run_turns(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
        turns_to_run: u32,
    ) -> Result<GameResult> {
        for _ in 0..turns_to_run {
            if let Some(result) = self.run_turn_once(controller1, controller2)? {
                return Ok(result);
            }
        }
        Ok(GameResult {
            winner: None,
            turns_played: self.turns_elapsed,
            end_reason: GameEndReason::Manual,
        })
    }

    /// Play one turn for whichever player is active
    ///
    /// Returns the result if the game ended during (or before) this turn.
    pub fn run_turn_once(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
    ) -> Result<Option<GameResult>> {
        if let Some(result) = self.check_game_over() {
            return Ok(Some(result));
        }
        if self.turns_elapsed >= self.max_turns {
            return Ok(Some(GameResult {
                winner: None,
                turns_played: self.turns_elapsed,
                end_reason: GameEndReason::TurnLimit,
            }));
        }

        let active_idx = (self.turns_elapsed % 2) as usize;
        let active = self.game.players[active_idx].id;
        let controller: &mut dyn PlayerController = if active_idx == 0 {
            &mut *controller1
        } else {
            &mut *controller2
        };
        self.turns_elapsed += 1;

        if active_idx == 0 && self.game.config.rotate_weather {
            self.rotate_weather();
        }
        self.game.logger.log_fmt(
            VerbosityLevel::Normal,
            Some(LogCategory::Turn),
            format_args!(
                "Turn {} ({}), weather {}",
                self.turns_elapsed,
                self.game.get_player(active)?.name,
                self.game.weather.current()
            ),
        );

        if let Some(card_id) = self.game.draw_card(active)? {
            self.game.logger.trace(
                LogCategory::Turn,
                format_args!("Player {active} draws {card_id}"),
            );
        }

        self.fire_board_trigger(active, Trigger::StartOfTurn)?;
        if let Some(result) = self.check_game_over() {
            return Ok(Some(result));
        }

        self.play_phase(active, controller)?;
        if let Some(result) = self.check_game_over() {
            return Ok(Some(result));
        }

        self.attack_phase(active, controller)?;
        if let Some(result) = self.check_game_over() {
            return Ok(Some(result));
        }

        self.fire_board_trigger(active, Trigger::EndOfTurn)?;
        Ok(self.check_game_over())
    }

    /// Fire `trigger` for each of the player's creatures, then resolve
    fn fire_board_trigger(&mut self, player_id: PlayerId, trigger: Trigger) -> Result<()> {
        let creatures: Vec<CardId> = self
            .game
            .get_player(player_id)?
            .battlefield
            .creatures()
            .collect();
        for card_id in creatures {
            self.game.handle_effect(card_id, trigger);
        }
        self.game.resolve_actions();
        Ok(())
    }

    /// Offer cards from hand until the controller passes
    fn play_phase(&mut self, active: PlayerId, controller: &mut dyn PlayerController) -> Result<()> {
        loop {
            let available = self.playable_cards(active)?;
            if available.is_empty() {
                return Ok(());
            }
            let view = GameStateView::new(self.game, active);
            let Some(choice) = controller.choose_action(&view, &available) else {
                return Ok(());
            };
            let PlayerAction::PlayCard(card_id) = choice else {
                self.game.logger.warn(
                    LogCategory::Turn,
                    format_args!("Ignoring {choice:?}: only cards can be played now"),
                );
                return Ok(());
            };
            if !available.contains(&choice) {
                self.game.logger.warn(
                    LogCategory::Turn,
                    format_args!("Ignoring {choice:?}: card is not playable"),
                );
                return Ok(());
            }

            self.game.add_action(GameAction::PlayCard {
                card: card_id,
                owner: active,
                target: None,
            });
            self.game.resolve_actions();
            if self.game.is_over() {
                return Ok(());
            }
        }
    }

    fn playable_cards(&self, player_id: PlayerId) -> Result<Vec<PlayerAction>> {
        let player = self.game.get_player(player_id)?;
        let room = !player.battlefield.is_full();
        Ok(player
            .zones
            .hand
            .cards
            .iter()
            .filter(|&&card_id| {
                self.game
                    .cards
                    .get(card_id)
                    .map(|c| room || !c.is_creature())
                    .unwrap_or(false)
            })
            .map(|&card_id| PlayerAction::PlayCard(card_id))
            .collect())
    }

    /// Let each creature (in slot order) pick a slot to attack, then resolve
    fn attack_phase(
        &mut self,
        active: PlayerId,
        controller: &mut dyn PlayerController,
    ) -> Result<()> {
        let Some(defender) = self.game.opponent_of(active) else {
            return Ok(());
        };
        let slots = self.game.get_player(defender)?.battlefield.capacity();
        let attackers: Vec<CardId> = self
            .game
            .get_player(active)?
            .battlefield
            .creatures()
            .collect();

        for attacker in attackers {
            let available: Vec<PlayerAction> = (0..slots)
                .map(|slot| PlayerAction::Attack { attacker, slot })
                .collect();
            let view = GameStateView::new(self.game, active);
            match controller.choose_action(&view, &available) {
                Some(PlayerAction::Attack { attacker: chosen, slot }) if chosen == attacker => {
                    self.game.handle_creature_combat(attacker, defender, slot);
                }
                Some(other) => {
                    self.game.logger.warn(
                        LogCategory::Combat,
                        format_args!("Ignoring {other:?}: not an attack for {attacker}"),
                    );
                }
                None => {}
            }
        }
        self.game.resolve_actions();
        Ok(())
    }

    fn rotate_weather(&mut self) {
        let idx = self.game.rng.borrow_mut().gen_range(0..Weather::ALL.len());
        self.game.set_weather(Weather::ALL[idx]);
    }

    fn check_game_over(&self) -> Option<GameResult> {
        let defeated: Vec<PlayerId> = self
            .game
            .players
            .iter()
            .filter(|p| p.is_defeated())
            .map(|p| p.id)
            .collect();
        let end_reason = match defeated.as_slice() {
            [] => return None,
            [loser] => GameEndReason::PlayerDeath(*loser),
            _ => GameEndReason::Draw,
        };
        Some(GameResult {
            winner: self.game.winner(),
            turns_played: self.turns_elapsed,
            end_reason,
        })
    }

    fn notify_game_end(
        &self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
        winner: Option<PlayerId>,
    ) {
        self.notify_one(controller1, winner);
        self.notify_one(controller2, winner);
    }

    fn notify_one(&self, controller: &mut dyn PlayerController, winner: Option<PlayerId>) {
        let player_id = controller.player_id();
        let view = GameStateView::new(self.game, player_id);
        controller.on_game_end(&view, winner == Some(player_id));
    }
}
