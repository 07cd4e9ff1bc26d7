#[macro_use]
mod macros;

pub mod error;
pub mod flush;
pub mod model;
pub mod sim;
pub mod view;
pub mod worldgen;

#[cfg(test)]
mod testutil;

pub use error::{Result, WorldError};
pub use model::{
    Actor, Bestiary, BlockCatalog, BlockSet, BlockType, CreatureCatalog, CreatureTemplate,
    Position, World,
};
pub use sim::{Direction, Encounter, EncounterState, Session, SharedWorld};
pub use worldgen::{WorldGenConfig, generate_world};
