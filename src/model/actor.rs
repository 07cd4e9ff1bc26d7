use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::creature::CreatureTemplate;
use super::stats::{StatBag, StatValue, keys};
use crate::error::{Result, WorldError};

/// Integer grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Item name to count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    pub fn add(&mut self, item: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.items.entry(item.to_string()).or_insert(0) += amount;
    }

    /// Remove `amount` of `item`. Fails without mutating when short.
    pub fn remove(&mut self, item: &str, amount: u32) -> Result<()> {
        let held = self.count(item);
        if held < amount {
            return Err(WorldError::InsufficientInventory {
                item: item.to_string(),
                held,
                requested: amount,
            });
        }
        if held == amount {
            self.items.remove(item);
        } else {
            self.items.insert(item.to_string(), held - amount);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (item, count) in &self.items {
            writeln!(f, "{item}: {count}")?;
        }
        Ok(())
    }
}

/// Persistent part of an actor's stats: base values plus upgrade levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub base: StatBag,
    #[serde(default)]
    pub upgrades: BTreeMap<String, i64>,
}

/// A player or a creature instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub position: Position,
    stats: StatRecord,
    pub inventory: Inventory,
}

impl Actor {
    /// A fresh level-zero player.
    pub fn player(name: &str, position: Position) -> Self {
        let base = StatBag::new()
            .with(keys::NAME, name)
            .with(keys::DMG, 5)
            .with(keys::HEALTH, 20)
            .with(keys::MAX_HEALTH, 20)
            .with(keys::SPEED, 5)
            .with(keys::AGGRESSION, 0)
            .with(keys::VIEW, 10)
            .with(keys::XP, 0);
        Self::restore(
            StatRecord {
                base,
                upgrades: BTreeMap::new(),
            },
            Inventory::new(),
            position,
        )
    }

    /// Build a creature instance at `position` from its template.
    pub fn from_template(template: &CreatureTemplate, position: Position) -> Result<Self> {
        let mut base = template.stats.clone();
        let health = base.int(keys::HEALTH)?;
        if !base.contains(keys::MAX_HEALTH) {
            base.set(keys::MAX_HEALTH, health);
        }
        Ok(Self {
            position,
            stats: StatRecord {
                base,
                upgrades: BTreeMap::new(),
            },
            inventory: Inventory::new(),
        })
    }

    pub fn restore(stats: StatRecord, inventory: Inventory, position: Position) -> Self {
        Self {
            position,
            stats,
            inventory,
        }
    }

    pub fn record(&self) -> &StatRecord {
        &self.stats
    }

    pub fn base_stats(&self) -> &StatBag {
        &self.stats.base
    }

    /// Base stats with upgrade levels applied.
    pub fn stats(&self) -> StatBag {
        let mut derived = self.stats.base.clone();
        for (key, level) in &self.stats.upgrades {
            if let Ok(value) = derived.int(key) {
                derived.set(key, value + level);
            }
        }
        derived
    }

    /// A derived integer stat.
    pub fn stat(&self, key: &str) -> Result<i64> {
        let base = self.stats.base.int(key)?;
        Ok(base + self.stats.upgrades.get(key).copied().unwrap_or(0))
    }

    pub fn name(&self) -> &str {
        self.stats.base.text(keys::NAME).unwrap_or("?")
    }

    pub fn health(&self) -> Result<i64> {
        self.stats.base.int(keys::HEALTH)
    }

    pub fn is_dead(&self) -> Result<bool> {
        Ok(self.health()? <= 0)
    }

    /// Apply damage, keeping health within `[0, max-health]`. Returns remaining health.
    pub fn take_damage(&mut self, amount: i64) -> Result<i64> {
        let max = self.stat(keys::MAX_HEALTH)?;
        let next = (self.health()? - amount).clamp(0, max);
        self.stats.base.set(keys::HEALTH, next);
        Ok(next)
    }

    pub fn gain_xp(&mut self, amount: i64) -> Result<i64> {
        self.stats.base.change_int(keys::XP, amount)
    }

    /// Raise a stat by one upgrade level.
    ///
    /// Only integer stats other than current health and xp can be upgraded.
    pub fn upgrade(&mut self, key: &str) -> Result<i64> {
        let upgradable = key != keys::HEALTH
            && key != keys::XP
            && matches!(self.stats.base.get(key), Ok(StatValue::Int(_)));
        if !upgradable {
            return Err(WorldError::InvalidStatName(key.to_string()));
        }
        *self.stats.upgrades.entry(key.to_string()).or_insert(0) += 1;
        self.stat(key)
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }
}
