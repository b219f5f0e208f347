//! Priority-ordered action queue
//!
//! The queue only does bookkeeping: ordering, per-creature supersession,
//! the processed-effects ledger and the chain depth of queued actions.
//! Executing the drained actions is the session's job
//! (see [`GameSession::resolve_actions`](crate::game::GameSession::resolve_actions)).

use crate::core::{CardId, Trigger};
use crate::game::GameAction;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Default ceiling on trigger chain depth
pub const MAX_ITERATION_DEPTH: usize = 3;

/// What happened to an action handed to [`ActionsQueue::add_action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOutcome {
    /// Inserted; nothing was displaced
    Queued,
    /// Inserted, replacing an older pending action for the same creature
    Replaced(GameAction),
    /// Rejected because the trigger chain is already too deep
    Dropped(GameAction),
}

impl QueueOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, QueueOutcome::Dropped(_))
    }
}

/// Pending action plus the ticket used to find it again
#[derive(Debug, Clone)]
struct QueuedAction {
    ticket: u64,
    /// Chain depth the action executes at
    depth: usize,
    action: GameAction,
}

/// Ordered buffer of pending actions
#[derive(Debug, Clone)]
pub struct ActionsQueue {
    /// Sorted by priority, FIFO among equal priorities
    pending: VecDeque<QueuedAction>,

    /// Creature id -> ticket of the action queued on its behalf
    active_creature_actions: FxHashMap<CardId, u64>,

    /// (source, trigger) pairs that already fired in this resolution chain
    processed_effects: FxHashSet<(CardId, Trigger)>,

    /// Depth of the action being executed, 0 outside a pass
    iteration_depth: usize,
    max_iteration_depth: usize,
    resolving: bool,

    next_ticket: u64,

    /// Actions rejected by the depth guard since creation or cleanup
    dropped: usize,
}

impl ActionsQueue {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_ITERATION_DEPTH)
    }

    pub fn with_max_depth(max_iteration_depth: usize) -> Self {
        ActionsQueue {
            pending: VecDeque::new(),
            active_creature_actions: FxHashMap::default(),
            processed_effects: FxHashSet::default(),
            iteration_depth: 0,
            max_iteration_depth,
            resolving: false,
            next_ticket: 0,
            dropped: 0,
        }
    }

    /// Insert an action at its priority position
    ///
    /// Creature-keyed actions replace any action still pending for the same
    /// creature (last writer wins). Among equal priorities, earlier actions
    /// stay ahead of later ones. During a pass the action runs at the depth
    /// of the action that queued it.
    pub fn add_action(&mut self, action: GameAction) -> QueueOutcome {
        let depth = self.iteration_depth.max(1);
        self.insert(action, depth)
    }

    /// Insert an action caused by a trigger of the action being executed
    ///
    /// It runs one level deeper than its cause. Outside a pass this is the
    /// same as [`add_action`](ActionsQueue::add_action).
    pub fn add_triggered_action(&mut self, action: GameAction) -> QueueOutcome {
        let depth = self.iteration_depth + 1;
        self.insert(action, depth)
    }

    fn insert(&mut self, action: GameAction, depth: usize) -> QueueOutcome {
        if self.iteration_depth >= self.max_iteration_depth {
            self.dropped += 1;
            return QueueOutcome::Dropped(action);
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let mut replaced = None;
        if let Some(creature) = action.creature_key() {
            if let Some(old_ticket) = self.active_creature_actions.insert(creature, ticket) {
                if let Some(pos) = self.pending.iter().position(|q| q.ticket == old_ticket) {
                    replaced = self.pending.remove(pos).map(|q| q.action);
                }
            }
        }

        let priority = action.priority();
        let pos = self
            .pending
            .iter()
            .position(|q| q.action.priority() > priority)
            .unwrap_or(self.pending.len());
        self.pending.insert(
            pos,
            QueuedAction {
                ticket,
                depth,
                action,
            },
        );

        match replaced {
            Some(old) => QueueOutcome::Replaced(old),
            None => QueueOutcome::Queued,
        }
    }

    /// Pop the next action, releasing its creature reservation
    ///
    /// During a pass the popped action's depth becomes the current depth.
    pub fn pop_next(&mut self) -> Option<GameAction> {
        let QueuedAction {
            ticket,
            depth,
            action,
        } = self.pending.pop_front()?;
        if self.resolving {
            self.iteration_depth = depth;
        }
        if let Some(creature) = action.creature_key() {
            if self.active_creature_actions.get(&creature) == Some(&ticket) {
                self.active_creature_actions.remove(&creature);
            }
        }
        Some(action)
    }

    /// Enter a resolution pass with a fresh processed-effects ledger
    ///
    /// Returns false if a pass is already running; its drain picks up
    /// anything queued since.
    pub fn begin_pass(&mut self) -> bool {
        if self.resolving {
            return false;
        }
        self.resolving = true;
        self.processed_effects.clear();
        true
    }

    /// Leave the resolution pass
    pub fn end_pass(&mut self) {
        self.resolving = false;
        self.iteration_depth = 0;
        self.active_creature_actions.clear();
    }

    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    pub fn iteration_depth(&self) -> usize {
        self.iteration_depth
    }

    pub fn max_iteration_depth(&self) -> usize {
        self.max_iteration_depth
    }

    pub fn is_effect_processed(&self, source: CardId, trigger: Trigger) -> bool {
        self.processed_effects.contains(&(source, trigger))
    }

    pub fn mark_effect_processed(&mut self, source: CardId, trigger: Trigger) {
        self.processed_effects.insert((source, trigger));
    }

    pub fn has_active_action(&self, creature: CardId) -> bool {
        self.active_creature_actions.contains_key(&creature)
    }

    /// The pending action queued on behalf of `creature`
    pub fn get_active_action(&self, creature: CardId) -> Option<&GameAction> {
        let ticket = self.active_creature_actions.get(&creature)?;
        self.pending
            .iter()
            .find(|q| q.ticket == *ticket)
            .map(|q| &q.action)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending actions in resolution order
    pub fn pending_actions(&self) -> impl Iterator<Item = &GameAction> {
        self.pending.iter().map(|q| &q.action)
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped
    }

    /// Drop every pending action and all bookkeeping
    pub fn cleanup(&mut self) {
        self.pending.clear();
        self.active_creature_actions.clear();
        self.processed_effects.clear();
        self.iteration_depth = 0;
        self.resolving = false;
        self.dropped = 0;
    }
}

impl Default for ActionsQueue {
    fn default() -> Self {
        Self::new()
    }
}
