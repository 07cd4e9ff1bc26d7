use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{Actor, Inventory, Position, StatRecord};

pub const STATS_FILE: &str = "stats-save.json";
pub const INVENTORY_FILE: &str = "inventory-save.json";

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

/// Save an actor's stats and inventory into `dir`. Position is not saved.
pub fn save_actor(actor: &Actor, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_json(&dir.join(STATS_FILE), actor.record())?;
    write_json(&dir.join(INVENTORY_FILE), &actor.inventory)?;
    Ok(())
}

/// Restore a saved actor at `position`.
pub fn load_actor(dir: &Path, position: Position) -> Result<Actor> {
    let stats: StatRecord = read_json(&dir.join(STATS_FILE))?;
    let inventory: Inventory = read_json(&dir.join(INVENTORY_FILE))?;
    Ok(Actor::restore(stats, inventory, position))
}

/// True when both actor files exist in `dir`.
pub fn actor_saved(dir: &Path) -> bool {
    dir.join(STATS_FILE).is_file() && dir.join(INVENTORY_FILE).is_file()
}
