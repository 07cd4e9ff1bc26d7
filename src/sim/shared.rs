//! One world, many actors.

use std::sync::RwLock;

use crate::error::{Result, WorldError};
use crate::model::World;

/// A world shared between sessions.
///
/// A turn (a move plus any encounter it starts, or a single combat action)
/// runs under the write lock from start to finish. Views take the read lock.
/// There is no finer-grained locking.
#[derive(Debug)]
pub struct SharedWorld {
    world: RwLock<World>,
}

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self {
            world: RwLock::new(world),
        }
    }

    /// Run one mutating turn with exclusive access.
    pub fn turn<T>(&self, f: impl FnOnce(&mut World) -> Result<T>) -> Result<T> {
        let mut world = self.world.write().map_err(|_| WorldError::LockPoisoned)?;
        f(&mut world)
    }

    /// Run a read-only query alongside other readers.
    pub fn view<T>(&self, f: impl FnOnce(&World) -> Result<T>) -> Result<T> {
        let world = self.world.read().map_err(|_| WorldError::LockPoisoned)?;
        f(&world)
    }

    pub fn into_inner(self) -> Result<World> {
        self.world.into_inner().map_err(|_| WorldError::LockPoisoned)
    }
}
