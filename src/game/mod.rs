//! Game session, action resolution and turn structure

pub mod actions;
pub mod combat;
pub mod controller;
pub mod events;
pub mod game_loop;
pub mod logger;
pub mod queue;
pub mod random_controller;
pub mod state;
pub mod targeting;
pub mod triggers;
pub mod weather;
pub mod zero_controller;

pub use actions::{GameAction, Priority};
pub use combat::CombatHandler;
pub use controller::{GameStateView, PlayerAction, PlayerController};
pub use events::{EventBus, GameEvent, ListenerId};
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use logger::{GameLogger, LogCategory, LogEntry, OutputFormat, OutputMode};
pub use queue::{ActionsQueue, QueueOutcome, MAX_ITERATION_DEPTH};
pub use random_controller::RandomController;
pub use state::{GameSession, SessionConfig};
pub use targeting::TargetList;
pub use weather::{damage_modifier, Weather, WeatherSystem};
pub use zero_controller::ZeroController;
