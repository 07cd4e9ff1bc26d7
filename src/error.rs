//! Error type shared by every engine operation.

use thiserror::Error;

/// Errors surfaced by world generation, simulation, and persistence.
///
/// Catalog misses, bounds violations, and malformed saves are fatal to the
/// operation that raised them. Trade, stat, and movement request errors are
/// recoverable and leave all state untouched.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("unknown block: {0}")]
    UnknownBlock(String),

    #[error("unknown creature type: {0}")]
    UnknownCreatureType(u32),

    #[error("cell ({x}, {y}) is outside the {extent}x{extent} world")]
    OutOfBounds { x: i64, y: i64, extent: usize },

    #[error("malformed save: {0}")]
    MalformedSave(String),

    #[error("you only have {held} of {item}")]
    InsufficientInventory {
        item: String,
        held: u32,
        requested: u32,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("{0} has nothing to trade")]
    NotTradable(String),

    #[error("no such stat: {0}")]
    InvalidStatName(String),

    #[error("stat {key} is not a {expected}")]
    StatTypeMismatch { key: String, expected: &'static str },

    #[error("cannot move {requested} cells, speed is {speed}")]
    ExceedsSpeed { requested: i64, speed: i64 },

    #[error("not in an encounter")]
    NoEncounter,

    #[error("an encounter is in progress")]
    EncounterInProgress,

    #[error("the session has ended")]
    SessionOver,

    #[error("catalog error: {0}")]
    InvalidCatalog(String),

    #[error("world lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorldError {
    /// True for input errors the caller can re-prompt on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WorldError::InsufficientInventory { .. }
                | WorldError::InvalidSelection(_)
                | WorldError::NotTradable(_)
                | WorldError::InvalidStatName(_)
                | WorldError::StatTypeMismatch { .. }
                | WorldError::ExceedsSpeed { .. }
                | WorldError::NoEncounter
                | WorldError::EncounterInProgress
        )
    }
}

pub type Result<T> = std::result::Result<T, WorldError>;
