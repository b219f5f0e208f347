//! Observer notifications for UI and other collaborators
//!
//! Listeners are plain callbacks. They receive events after the state change
//! has happened and cannot mutate the session.

use crate::core::{CardId, PlayerId};
use crate::game::Weather;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something observable happened in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An action entered the queue
    ActionsQueued { pending: usize },
    /// A resolution pass drained the queue
    ActionsResolved,
    /// Board layout or ownership changed
    GameStateChanged,
    CreatureDamaged { card: CardId, amount: i32 },
    CreatureDied { card: CardId },
    PlayerDamaged { player: PlayerId, amount: i32 },
    WeatherChanged { from: Weather, to: Weather },
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Callback list, notified in subscription order
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already gone
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: GameEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    /// Detach every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
