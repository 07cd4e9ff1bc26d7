use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};

/// Well-known stat keys shared by players and creature templates.
pub mod keys {
    pub const NAME: &str = "name";
    pub const DMG: &str = "dmg";
    pub const HEALTH: &str = "health";
    pub const MAX_HEALTH: &str = "max-health";
    pub const SPEED: &str = "speed";
    pub const AGGRESSION: &str = "aggression";
    pub const VIEW: &str = "view";
    pub const XP: &str = "xp";
    pub const TRADE: &str = "trade";
    pub const TRADE_XP: &str = "trade-xp";
}

/// A single stat value. Untagged so data files can write plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl StatValue {
    fn kind(&self) -> &'static str {
        match self {
            StatValue::Bool(_) => "bool",
            StatValue::Int(_) => "integer",
            StatValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Bool(b) => write!(f, "{b}"),
            StatValue::Int(i) => write!(f, "{i}"),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        StatValue::Int(v)
    }
}

impl From<i32> for StatValue {
    fn from(v: i32) -> Self {
        StatValue::Int(v.into())
    }
}

impl From<bool> for StatValue {
    fn from(v: bool) -> Self {
        StatValue::Bool(v)
    }
}

impl From<&str> for StatValue {
    fn from(v: &str) -> Self {
        StatValue::Text(v.to_string())
    }
}

/// Keyed stat storage with typed accessors.
///
/// Every accessor returns `InvalidStatName` for a missing key and
/// `StatTypeMismatch` for a key holding the wrong variant, so a bad lookup is
/// an error value rather than a panic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBag {
    values: BTreeMap<String, StatValue>,
}

impl StatBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<StatValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Result<&StatValue> {
        self.values
            .get(key)
            .ok_or_else(|| WorldError::InvalidStatName(key.to_string()))
    }

    pub fn int(&self, key: &str) -> Result<i64> {
        match self.get(key)? {
            StatValue::Int(v) => Ok(*v),
            _ => Err(mismatch(key, "integer")),
        }
    }

    /// Integer stat, or `default` when the key is absent. Wrong types still error.
    pub fn int_or(&self, key: &str, default: i64) -> Result<i64> {
        if self.contains(key) {
            self.int(key)
        } else {
            Ok(default)
        }
    }

    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.get(key)? {
            StatValue::Bool(v) => Ok(*v),
            _ => Err(mismatch(key, "bool")),
        }
    }

    pub fn text(&self, key: &str) -> Result<&str> {
        match self.get(key)? {
            StatValue::Text(v) => Ok(v),
            _ => Err(mismatch(key, "string")),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<StatValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Add `delta` to an existing integer stat and return the new value.
    pub fn change_int(&mut self, key: &str, delta: i64) -> Result<i64> {
        let current = self.int(key)?;
        let next = current + delta;
        self.values.insert(key.to_string(), StatValue::Int(next));
        Ok(next)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn mismatch(key: &str, expected: &'static str) -> WorldError {
    WorldError::StatTypeMismatch {
        key: key.to_string(),
        expected,
    }
}

impl fmt::Display for StatBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.values {
            writeln!(f, "{key}: {value} ({})", value.kind())?;
        }
        Ok(())
    }
}
