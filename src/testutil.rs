use std::collections::BTreeMap;

use crate::model::*;

// ---------------------------------------------------------------------------
// Block catalog
// ---------------------------------------------------------------------------

pub const WATER: BlockId = 0;
pub const SAND: BlockId = 1;
pub const GRASS: BlockId = 2;
pub const TALL_GRASS: BlockId = 3;
pub const ROCK: BlockId = 4;
pub const FLOOR: BlockId = 5;
pub const WALL: BlockId = 6;
pub const SURVEYOR: BlockId = 7;

fn block(id: BlockId, name: &str, solid: bool, display: Option<u8>) -> BlockType {
    BlockType {
        solid,
        display,
        ..BlockType::new(id, name)
    }
}

/// The default biome and village blocks, matching `WorldGenConfig::default()` names.
pub fn blocks() -> BlockSet {
    let mut grass = block(GRASS, "grass", false, Some(34));
    grass.mob_spawn_chance = Some(5);
    grass.map_weight = 2;
    let mut tall = block(TALL_GRASS, "tall grass", false, Some(28));
    tall.hide_mobs = true;
    tall.mob_spawn_chance = Some(8);
    let mut surveyor = block(SURVEYOR, "surveyor", false, Some(94));
    surveyor.extras.set("spawn-chance", 10);
    surveyor.mob_display = Some(1);
    surveyor.map_weight = 200;

    BlockSet::new([
        block(WATER, "water", true, Some(27)),
        block(SAND, "sand", false, Some(220)),
        grass,
        tall,
        block(ROCK, "rock", true, Some(244)),
        block(FLOOR, "village floor", false, None),
        block(WALL, "village wall", true, Some(94)),
        surveyor,
    ])
    .unwrap()
}

// ---------------------------------------------------------------------------
// Creature catalog
// ---------------------------------------------------------------------------

pub const RAT: CreatureId = 1;
pub const BRUTE: CreatureId = 2;
pub const MERCHANT: CreatureId = 3;
pub const SHY: CreatureId = 4;

fn template(id: CreatureId, stats: StatBag, drops: &[&str]) -> CreatureTemplate {
    CreatureTemplate {
        id,
        stats,
        drops: drops.iter().map(|d| d.to_string()).collect(),
        quotes: BTreeMap::new(),
    }
}

fn fighter(name: &str, dmg: i64, health: i64, speed: i64, aggression: i64, xp: i64) -> StatBag {
    StatBag::new()
        .with(keys::NAME, name)
        .with(keys::DMG, dmg)
        .with(keys::HEALTH, health)
        .with(keys::MAX_HEALTH, health)
        .with(keys::SPEED, speed)
        .with(keys::AGGRESSION, aggression)
        .with(keys::XP, xp)
}

/// Four creature types: an always-aggressive rat, a fast hard-hitting brute,
/// a passive merchant that trades, and a creature that never strikes first.
pub fn creatures() -> Bestiary {
    let mut rat = template(RAT, fighter("rat", 1, 3, 2, 100, 5), &["tail", "bone"]);
    rat.quotes
        .insert("entrance".to_string(), vec!["squeak".to_string()]);
    let brute = template(BRUTE, fighter("brute", 4, 30, 9, 50, 40), &["club"]);
    let merchant = template(
        MERCHANT,
        fighter("merchant", 1, 5, 1, 0, 2)
            .with(keys::TRADE, 3)
            .with(keys::TRADE_XP, 4),
        &["coin"],
    );
    let shy = template(SHY, fighter("hermit", 1, 4, 5, 0, 3), &["bone"]);
    Bestiary::new(vec![rat, brute, merchant, shy]).unwrap()
}

/// An `extent`×`extent` grass world with no creatures.
pub fn open_world(extent: usize) -> World {
    World::new(extent, GRASS)
}
