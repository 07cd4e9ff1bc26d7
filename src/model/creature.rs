use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::stats::{StatBag, keys};
use crate::error::{Result, WorldError};

/// Creature-type identifier stored in the occupancy grid. Zero means empty.
pub type CreatureId = u32;

pub const EMPTY: CreatureId = 0;

/// Moments in an encounter that a creature may say something about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DialogueCue {
    Entrance,
    Attack,
    PlayerVictory,
    MobVictory,
    PlayerRun,
}

string_enum!(DialogueCue {
    Entrance => "entrance",
    Attack => "attack",
    PlayerVictory => "player-victory",
    MobVictory => "mob-victory",
    PlayerRun => "player-run",
});

/// Template a creature instance is built from whenever its cell is visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: CreatureId,
    pub stats: StatBag,
    #[serde(default)]
    pub drops: Vec<String>,
    #[serde(default)]
    pub quotes: BTreeMap<String, Vec<String>>,
}

impl CreatureTemplate {
    pub fn name(&self) -> &str {
        self.stats.text(keys::NAME).unwrap_or("creature")
    }

    /// `(items offered, xp per item)` when this creature trades.
    pub fn trade_terms(&self) -> Result<Option<(u32, i64)>> {
        if !self.stats.contains(keys::TRADE) || !self.stats.contains(keys::TRADE_XP) {
            return Ok(None);
        }
        let count = self.stats.int(keys::TRADE)?;
        let xp = self.stats.int(keys::TRADE_XP)?;
        if count <= 0 {
            return Ok(None);
        }
        let count = u32::try_from(count).map_err(|_| {
            WorldError::InvalidCatalog(format!("{}: trade count {count} is too large", self.name()))
        })?;
        Ok(Some((count, xp)))
    }

    /// A random line for the cue, if the template has any.
    pub fn quote(&self, cue: DialogueCue, rng: &mut dyn RngCore) -> Option<&str> {
        let lines = self.quotes.get(cue.as_str())?;
        if lines.is_empty() {
            return None;
        }
        Some(lines[rng.random_range(0..lines.len())].as_str())
    }
}

/// Read-only registry of creature templates.
pub trait CreatureCatalog: Send + Sync {
    fn template(&self, id: CreatureId) -> Result<&CreatureTemplate>;

    /// Number of creature types; valid ids are `1..=count()`.
    fn count(&self) -> u32;

    /// Every item name any creature can drop, sorted.
    fn all_drops(&self) -> &[String];
}

/// In-memory creature catalog with contiguous ids starting at 1.
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    templates: Vec<CreatureTemplate>,
    drops: Vec<String>,
}

impl Bestiary {
    pub fn new(mut templates: Vec<CreatureTemplate>) -> Result<Self> {
        templates.sort_by_key(|t| t.id);
        for (i, template) in templates.iter().enumerate() {
            let expected = i as CreatureId + 1;
            if template.id != expected {
                return Err(WorldError::InvalidCatalog(format!(
                    "creature ids must run 1..={} without gaps, found {} where {} was expected",
                    templates.len(),
                    template.id,
                    expected
                )));
            }
            template.stats.text(keys::NAME)?;
        }
        let drops: BTreeSet<String> = templates
            .iter()
            .flat_map(|t| t.drops.iter().cloned())
            .collect();
        Ok(Self {
            templates,
            drops: drops.into_iter().collect(),
        })
    }

    /// Parse a JSON array of creature templates.
    pub fn from_json(json: &str) -> Result<Self> {
        let templates: Vec<CreatureTemplate> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

impl CreatureCatalog for Bestiary {
    fn template(&self, id: CreatureId) -> Result<&CreatureTemplate> {
        if id == EMPTY {
            return Err(WorldError::UnknownCreatureType(id));
        }
        self.templates
            .get(id as usize - 1)
            .ok_or(WorldError::UnknownCreatureType(id))
    }

    fn count(&self) -> u32 {
        self.templates.len() as u32
    }

    fn all_drops(&self) -> &[String] {
        &self.drops
    }
}
