use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::stats::StatBag;
use crate::error::{Result, WorldError};

pub type BlockId = u32;

/// Static properties of one terrain block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    #[serde(default)]
    pub solid: bool,
    /// Map color index; `None` renders as blank.
    #[serde(default, deserialize_with = "color_or_none")]
    pub display: Option<u8>,
    #[serde(default = "default_map_weight")]
    pub map_weight: u32,
    #[serde(default)]
    pub mob_spawn_chance: Option<u32>,
    #[serde(default)]
    pub hide_mobs: bool,
    #[serde(default)]
    pub mob_display: Option<u8>,
    /// Type-specific properties such as a surveyor's `spawn-chance`.
    #[serde(flatten)]
    pub extras: StatBag,
}

fn default_map_weight() -> u32 {
    1
}

/// Accepts a color index, `null`, or the string `"none"`.
fn color_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u8>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Index(u8),
        Word(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Index(i)) => Ok(Some(i)),
        Some(Raw::Word(w)) if w == "none" => Ok(None),
        Some(Raw::Word(w)) => Err(serde::de::Error::custom(format!(
            "display must be a color index or \"none\", got {w:?}"
        ))),
    }
}

impl BlockType {
    pub fn new(id: BlockId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            solid: false,
            display: None,
            map_weight: 1,
            mob_spawn_chance: None,
            hide_mobs: false,
            mob_display: None,
            extras: StatBag::new(),
        }
    }
}

/// Read-only registry of block types, looked up by id or name.
pub trait BlockCatalog: Send + Sync {
    fn block(&self, id: BlockId) -> Result<&BlockType>;

    fn block_named(&self, name: &str) -> Result<&BlockType>;

    fn is_solid(&self, id: BlockId) -> Result<bool> {
        Ok(self.block(id)?.solid)
    }
}

/// In-memory block catalog, usually loaded from a JSON data file.
#[derive(Debug, Clone, Default)]
pub struct BlockSet {
    by_id: BTreeMap<BlockId, BlockType>,
    by_name: HashMap<String, BlockId>,
}

impl BlockSet {
    /// Build a catalog, rejecting duplicate ids or names.
    pub fn new(blocks: impl IntoIterator<Item = BlockType>) -> Result<Self> {
        let mut set = Self::default();
        for block in blocks {
            if set.by_name.contains_key(&block.name) {
                return Err(WorldError::InvalidCatalog(format!(
                    "duplicate block name {:?}",
                    block.name
                )));
            }
            if set.by_id.contains_key(&block.id) {
                return Err(WorldError::InvalidCatalog(format!(
                    "duplicate block id {}",
                    block.id
                )));
            }
            set.by_name.insert(block.name.clone(), block.id);
            set.by_id.insert(block.id, block);
        }
        Ok(set)
    }

    /// Parse a JSON array of block definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let blocks: Vec<BlockType> = serde_json::from_str(json)?;
        Self::new(blocks)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.by_id.values()
    }
}

impl BlockCatalog for BlockSet {
    fn block(&self, id: BlockId) -> Result<&BlockType> {
        self.by_id
            .get(&id)
            .ok_or_else(|| WorldError::UnknownBlock(id.to_string()))
    }

    fn block_named(&self, name: &str) -> Result<&BlockType> {
        self.by_name
            .get(name)
            .and_then(|id| self.by_id.get(id))
            .ok_or_else(|| WorldError::UnknownBlock(name.to_string()))
    }
}
