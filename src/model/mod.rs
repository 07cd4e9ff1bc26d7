pub mod actor;
pub mod block;
pub mod creature;
pub mod grid;
pub mod stats;
pub mod world;

pub use actor::{Actor, Inventory, Position, StatRecord};
pub use block::{BlockCatalog, BlockId, BlockSet, BlockType};
pub use creature::{Bestiary, CreatureCatalog, CreatureId, CreatureTemplate, DialogueCue, EMPTY};
pub use grid::Grid;
pub use stats::{StatBag, StatValue, keys};
pub use world::World;
