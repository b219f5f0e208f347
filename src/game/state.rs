//! Game session: the owner of all game state
//!
//! There are no global singletons. Everything an action needs (players,
//! cards, queue, weather, combat declarations, listeners, logger) lives on
//! one `GameSession` that is passed explicitly.

use crate::core::{Card, CardId, EntityId, EntityStore, Player, PlayerId, PlayerName, Trigger};
use crate::game::{
    ActionsQueue, CombatHandler, EventBus, GameAction, GameEvent, GameLogger, ListenerId,
    LogCategory, QueueOutcome, Weather, WeatherSystem,
};
use crate::{DuelError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Tunable session parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_health: i32,
    pub battlefield_slots: usize,
    /// Trigger chain depth allowed before new actions are dropped
    pub max_iteration_depth: usize,
    pub starting_hand_size: usize,
    pub initial_weather: Weather,
    /// Pick a random weather at the start of every round
    pub rotate_weather: bool,
    pub max_turns: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            starting_health: 20,
            battlefield_slots: 5,
            max_iteration_depth: crate::game::queue::MAX_ITERATION_DEPTH,
            starting_hand_size: 3,
            initial_weather: Weather::Clear,
            rotate_weather: false,
            max_turns: 50,
        }
    }
}

/// Complete state of one duel
#[derive(Debug, Serialize)]
pub struct GameSession {
    pub config: SessionConfig,

    /// All card instances in the game
    pub cards: EntityStore<Card>,

    /// Both players (Vec for stable ordering)
    pub players: Vec<Player>,

    #[serde(skip)]
    pub queue: ActionsQueue,

    pub weather: WeatherSystem,

    #[serde(skip)]
    pub combat: CombatHandler,

    #[serde(skip)]
    pub events: EventBus,

    /// Gameplay RNG (shuffles, weather rotation)
    pub rng: RefCell<ChaCha12Rng>,

    /// Unified entity ID generator (shared across all entity types)
    next_entity_id: u32,

    pub logger: GameLogger,
}

impl GameSession {
    /// Create a session with two players who are each other's opponent
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        config: SessionConfig,
    ) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);

        let mut player1 = Player::new(
            p1_id,
            player1_name,
            config.starting_health,
            config.battlefield_slots,
        );
        let mut player2 = Player::new(
            p2_id,
            player2_name,
            config.starting_health,
            config.battlefield_slots,
        );
        player1.opponent = Some(p2_id);
        player2.opponent = Some(p1_id);

        GameSession {
            queue: ActionsQueue::with_max_depth(config.max_iteration_depth),
            weather: WeatherSystem::new(config.initial_weather),
            config,
            cards: EntityStore::new(),
            players: vec![player1, player2],
            combat: CombatHandler::new(),
            events: EventBus::new(),
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(0)),
            next_entity_id: 2,
            logger: GameLogger::new(),
        }
    }

    /// Set the RNG seed for deterministic gameplay
    pub fn seed_rng(&mut self, seed: u64) {
        *self.rng.borrow_mut() = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Allocate an ID and store the card built for it
    pub fn create_card(&mut self, build: impl FnOnce(CardId) -> Card) -> CardId {
        let id = self.next_id();
        self.cards.insert(id, build(id));
        id
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        self.get_player(id).ok().and_then(|p| p.opponent)
    }

    pub fn get_player_idx(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Player and slot index holding `card_id`, if it is on a battlefield
    pub fn find_battlefield_slot(&self, card_id: CardId) -> Option<(PlayerId, usize)> {
        self.players
            .iter()
            .find_map(|p| p.battlefield.position_of(card_id).map(|idx| (p.id, idx)))
    }

    pub fn is_on_battlefield(&self, card_id: CardId) -> bool {
        self.find_battlefield_slot(card_id).is_some()
    }

    /// Place a creature directly, without queuing or triggers
    ///
    /// Used to set up a board (tests, benchmarks). Keeps the one-slot-per-creature
    /// and occupant-owner invariants.
    pub fn put_onto_battlefield(&mut self, card_id: CardId, owner: PlayerId, slot: usize) -> Result<()> {
        if self.is_on_battlefield(card_id) {
            return Err(DuelError::InvalidAction(format!(
                "creature {card_id} is already on the battlefield"
            )));
        }
        if !self.cards.get(card_id)?.is_creature() {
            return Err(DuelError::InvalidAction(format!(
                "card {card_id} is not a creature"
            )));
        }
        self.get_player_mut(owner)?.battlefield.place(card_id, slot)?;
        self.cards.get_mut(card_id)?.owner = Some(owner);
        Ok(())
    }

    /// Give a card to a player's hand
    pub fn add_to_hand(&mut self, player_id: PlayerId, card_id: CardId) -> Result<()> {
        self.cards.get_mut(card_id)?.owner = Some(player_id);
        self.get_player_mut(player_id)?.zones.hand.add(card_id);
        Ok(())
    }

    /// Draw a card for a player
    pub fn draw_card(&mut self, player_id: PlayerId) -> Result<Option<CardId>> {
        let zones = &mut self.get_player_mut(player_id)?.zones;
        let drawn = zones.library.draw_top();
        if let Some(card_id) = drawn {
            zones.hand.add(card_id);
        }
        Ok(drawn)
    }

    /// Shuffle a player's library using the game's RNG
    pub fn shuffle_library(&mut self, player_id: PlayerId) -> Result<()> {
        let mut rng = self.rng.borrow_mut();
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(DuelError::EntityNotFound(player_id.as_u32()))?;
        player.zones.library.shuffle(&mut *rng);
        Ok(())
    }

    /// Queue an action and notify listeners
    pub fn add_action(&mut self, action: GameAction) -> QueueOutcome {
        self.enqueue(action, false)
    }

    /// Queue an action produced by a trigger, one chain level deeper than
    /// the action being executed
    pub(crate) fn add_triggered_action(&mut self, action: GameAction) -> QueueOutcome {
        self.enqueue(action, true)
    }

    fn enqueue(&mut self, action: GameAction, triggered: bool) -> QueueOutcome {
        #[cfg(feature = "verbose-logging")]
        let description = action.to_string();
        #[cfg(not(feature = "verbose-logging"))]
        let description = action.kind();

        let outcome = if triggered {
            self.queue.add_triggered_action(action)
        } else {
            self.queue.add_action(action)
        };
        match &outcome {
            QueueOutcome::Queued => {
                self.logger
                    .trace(LogCategory::Queue, format_args!("Queued {description}"));
            }
            QueueOutcome::Replaced(old) => {
                self.logger.trace(
                    LogCategory::Queue,
                    format_args!("Queued {description}, replacing {old}"),
                );
            }
            QueueOutcome::Dropped(_) => {
                self.logger.warn(
                    LogCategory::Queue,
                    format_args!(
                        "Dropping {description}: resolution depth limit {} reached",
                        self.queue.max_iteration_depth()
                    ),
                );
            }
        }
        if outcome.is_dropped() {
            return outcome;
        }
        self.events.emit(GameEvent::ActionsQueued {
            pending: self.queue.pending_count(),
        });
        outcome
    }

    /// Drain the queue, executing actions in priority order
    ///
    /// Actions may queue more actions while this runs; they are picked up by
    /// the same drain in priority order. Trigger chains are bounded by the
    /// queue's depth limit. A failing action is logged and skipped. Calling
    /// this while a drain is running does nothing.
    pub fn resolve_actions(&mut self) {
        if self.queue.is_empty() || !self.queue.begin_pass() {
            return;
        }
        self.logger.trace(
            LogCategory::Queue,
            format_args!("Resolving {} action(s)", self.queue.pending_count()),
        );

        while let Some(action) = self.queue.pop_next() {
            let kind = action.kind();
            if let Err(err) = self.execute_action(action) {
                self.logger
                    .warn(LogCategory::Action, format_args!("{kind} skipped: {err}"));
            }
        }

        self.queue.end_pass();
        self.combat.reset_round();

        self.events.emit(GameEvent::ActionsResolved);
        self.events.emit(GameEvent::GameStateChanged);
    }

    pub fn is_effect_processed(&self, source: CardId, trigger: Trigger) -> bool {
        self.queue.is_effect_processed(source, trigger)
    }

    pub fn mark_effect_processed(&mut self, source: CardId, trigger: Trigger) {
        self.queue.mark_effect_processed(source, trigger);
    }

    pub fn has_active_action(&self, creature: CardId) -> bool {
        self.queue.has_active_action(creature)
    }

    pub fn get_active_action(&self, creature: CardId) -> Option<&GameAction> {
        self.queue.get_active_action(creature)
    }

    pub fn pending_actions_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// Pending actions in resolution order (for visualization)
    pub fn pending_actions(&self) -> impl Iterator<Item = &GameAction> {
        self.queue.pending_actions()
    }

    /// Change the weather, notifying listeners if it actually changed
    pub fn set_weather(&mut self, weather: Weather) {
        if let Some(previous) = self.weather.set_weather(weather) {
            self.logger.log_fmt(
                crate::game::VerbosityLevel::Normal,
                Some(LogCategory::Weather),
                format_args!("Weather changes from {previous} to {weather}"),
            );
            self.events.emit(GameEvent::WeatherChanged {
                from: previous,
                to: weather,
            });
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Drop all queued work and detach every listener
    pub fn cleanup(&mut self) {
        self.queue.cleanup();
        self.combat.reset_round();
        self.events.clear();
    }

    /// The winner, once exactly one player is left standing
    pub fn winner(&self) -> Option<PlayerId> {
        let standing: Vec<_> = self.players.iter().filter(|p| !p.is_defeated()).collect();
        match standing.as_slice() {
            [only] if self.players.len() > 1 => Some(only.id),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.players.iter().any(|p| p.is_defeated())
    }

    /// Serialize the board state as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
