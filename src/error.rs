//! Error types for the duel engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuelError {
    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Battlefield slot {index} is already occupied by card {occupant}")]
    SlotOccupied { index: usize, occupant: u32 },

    #[error("Battlefield is full for player {0}")]
    BattlefieldFull(u32),

    #[error("Invalid battlefield slot: {0}")]
    InvalidSlot(usize),

    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DuelError {
    fn from(err: serde_json::Error) -> Self {
        DuelError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DuelError>;
