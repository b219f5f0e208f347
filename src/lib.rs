//! Creature Duel - turn-based creature battling card game engine
//!
//! The heart of the crate is the action resolution core: game mutations are
//! queued as [`game::GameAction`] commands, ordered by priority, and resolved
//! by an [`game::ActionsQueue`] with bounded re-entrancy so that triggered
//! creature effects can chain without running away.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod zones;

pub use error::{DuelError, Result};
