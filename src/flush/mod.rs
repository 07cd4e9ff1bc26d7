pub mod actor;
pub mod grid;

pub use actor::{actor_saved, load_actor, save_actor};
pub use grid::{load_grid, load_world, save_grid, save_world, world_saved};
