pub mod combat;
pub mod movement;
pub mod seed;
mod session;
mod shared;

pub use combat::{CombatEvent, Encounter, EncounterState};
pub use movement::{Axis, Direction, destination, resolve_move};
pub use session::{Session, Step};
pub use shared::SharedWorld;
