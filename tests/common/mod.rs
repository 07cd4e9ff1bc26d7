#![allow(dead_code)]

use mud_world::model::*;
use mud_world::worldgen::config::Span;
use mud_world::WorldGenConfig;

pub const BLOCKS_JSON: &str = r#"[
    {"id": 0, "name": "water", "solid": true, "display": 27},
    {"id": 1, "name": "sand", "display": 220},
    {"id": 2, "name": "grass", "display": 34, "mob-spawn-chance": 4, "map-weight": 2},
    {"id": 3, "name": "tall grass", "display": 28, "mob-spawn-chance": 6, "hide-mobs": true},
    {"id": 4, "name": "rock", "solid": true, "display": 244},
    {"id": 5, "name": "village floor", "display": "none"},
    {"id": 6, "name": "village wall", "solid": true, "display": 94},
    {"id": 7, "name": "surveyor", "display": 94, "mob-display": 1, "spawn-chance": 5, "map-weight": 300}
]"#;

pub const MOBS_JSON: &str = r#"[
    {
        "id": 1,
        "stats": {"name": "wolf", "dmg": 3, "health": 6, "speed": 7,
                  "aggression": 100, "xp": 10},
        "drops": ["pelt", "fang"],
        "quotes": {"entrance": ["grr"], "mob-victory": ["awoo"]}
    },
    {
        "id": 2,
        "stats": {"name": "peddler", "dmg": 1, "health": 4, "speed": 1,
                  "aggression": 0, "xp": 1, "trade": 4, "trade-xp": 3},
        "drops": ["trinket"]
    },
    {
        "id": 3,
        "stats": {"name": "beetle", "dmg": 1, "health": 2, "speed": 2,
                  "aggression": 0, "xp": 2},
        "drops": ["shell"]
    }
]"#;

pub const GRASS: BlockId = 2;
pub const WALL: BlockId = 6;
pub const WOLF: CreatureId = 1;
pub const PEDDLER: CreatureId = 2;
pub const BEETLE: CreatureId = 3;

pub fn blocks() -> BlockSet {
    BlockSet::from_json(BLOCKS_JSON).unwrap()
}

pub fn creatures() -> Bestiary {
    Bestiary::from_json(MOBS_JSON).unwrap()
}

/// A world small enough to generate in a test but big enough for villages.
pub fn small_config(seed: u64) -> WorldGenConfig {
    let mut config = WorldGenConfig {
        seed,
        extent: 160,
        ..WorldGenConfig::default()
    };
    config.noise.octaves = 5;
    config.noise.base_wavelength = 40.0;
    config.settlements.count = Span::new(4, 6);
    config.settlements.anchor_margin = 40;
    config
}

pub fn grass_world(extent: usize) -> World {
    World::new(extent, GRASS)
}
