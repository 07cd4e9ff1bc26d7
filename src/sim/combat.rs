use rand::Rng;
use serde::{Deserialize, Serialize};

use super::seed;
use crate::error::{Result, WorldError};
use crate::model::{
    Actor, CreatureCatalog, CreatureId, CreatureTemplate, DialogueCue, EMPTY, Position, World, keys,
};

/// Where an encounter stands. Everything but `InCombat` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EncounterState {
    InCombat,
    PlayerVictory,
    PlayerDefeat,
    Fled,
    Traded,
}

string_enum!(EncounterState {
    InCombat => "in-combat",
    PlayerVictory => "player-victory",
    PlayerDefeat => "player-defeat",
    Fled => "fled",
    Traded => "traded",
});

impl EncounterState {
    pub fn is_over(self) -> bool {
        self != EncounterState::InCombat
    }

    fn cue(self) -> Option<DialogueCue> {
        match self {
            EncounterState::PlayerVictory => Some(DialogueCue::PlayerVictory),
            EncounterState::PlayerDefeat => Some(DialogueCue::MobVictory),
            EncounterState::Fled => Some(DialogueCue::PlayerRun),
            EncounterState::InCombat | EncounterState::Traded => None,
        }
    }
}

/// What happened during one encounter step, for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    /// The actor ran into a creature.
    Encountered {
        creature: String,
        cue: DialogueCue,
    },

    /// The creature hit the actor. `first_strike` is set for the hit landed
    /// on entry by a faster creature.
    CreatureStruck {
        damage: i64,
        actor_health: i64,
        first_strike: bool,
        cue: DialogueCue,
    },

    /// The actor hit the creature.
    ActorStruck { damage: i64, creature_health: i64 },

    /// The creature died; its xp and drops went to the actor.
    Looted { xp: i64, drops: Vec<String> },

    /// Items handed over in a trade.
    TradeCompleted { item: String, quantity: u32, xp: i64 },

    /// The encounter reached a terminal state.
    Ended {
        state: EncounterState,
        cue: Option<DialogueCue>,
    },
}

/// One actor fighting one creature.
///
/// The creature is rebuilt from its template when the encounter starts and is
/// discarded with the encounter. Only damage to the actor, xp, drops, inventory
/// changes, and clearing the creature's cell outlive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    creature_id: CreatureId,
    template: CreatureTemplate,
    creature: Actor,
    state: EncounterState,
}

impl Encounter {
    /// Start fighting whatever occupies `cell`.
    ///
    /// A creature faster than the actor strikes once before the actor can act,
    /// which may end the encounter in `PlayerDefeat` straight away.
    pub fn begin(
        world: &World,
        actor: &mut Actor,
        cell: Position,
        creatures: &dyn CreatureCatalog,
    ) -> Result<(Self, Vec<CombatEvent>)> {
        let creature_id = world.occupant(cell)?;
        if creature_id == EMPTY {
            return Err(WorldError::NoEncounter);
        }
        let template = creatures.template(creature_id)?.clone();
        let creature = Actor::from_template(&template, cell)?;
        let mut encounter = Self {
            creature_id,
            template,
            creature,
            state: EncounterState::InCombat,
        };

        let mut events = vec![CombatEvent::Encountered {
            creature: encounter.creature.name().to_string(),
            cue: DialogueCue::Entrance,
        }];
        if encounter.creature.stat(keys::SPEED)? > actor.stat(keys::SPEED)? {
            encounter.creature_strikes(actor, true, &mut events)?;
        }
        tracing::debug!(
            creature = encounter.creature.name(),
            %cell,
            state = %encounter.state,
            "encounter started"
        );
        Ok((encounter, events))
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn creature_id(&self) -> CreatureId {
        self.creature_id
    }

    pub fn creature(&self) -> &Actor {
        &self.creature
    }

    pub fn template(&self) -> &CreatureTemplate {
        &self.template
    }

    fn ensure_in_combat(&self) -> Result<()> {
        if self.state.is_over() {
            return Err(WorldError::NoEncounter);
        }
        Ok(())
    }

    /// Fails with `NoEncounter` once the creature no longer holds its cell,
    /// e.g. after another actor killed it in an earlier turn. The encounter
    /// is closed as `Fled` so nothing more can be taken from it.
    fn ensure_creature_present(&mut self, world: &World) -> Result<()> {
        self.ensure_in_combat()?;
        let cell = self.creature.position;
        if world.occupant(cell)? != self.creature_id {
            tracing::debug!(creature = self.creature.name(), %cell, "creature is gone");
            self.state = EncounterState::Fled;
            return Err(WorldError::NoEncounter);
        }
        Ok(())
    }

    fn finish(&mut self, state: EncounterState, events: &mut Vec<CombatEvent>) {
        self.state = state;
        events.push(CombatEvent::Ended {
            state,
            cue: state.cue(),
        });
    }

    fn creature_strikes(
        &mut self,
        actor: &mut Actor,
        first_strike: bool,
        events: &mut Vec<CombatEvent>,
    ) -> Result<()> {
        let damage = self.creature.stat(keys::DMG)?;
        let actor_health = actor.take_damage(damage)?;
        events.push(CombatEvent::CreatureStruck {
            damage,
            actor_health,
            first_strike,
            cue: DialogueCue::Attack,
        });
        if actor_health <= 0 {
            self.finish(EncounterState::PlayerDefeat, events);
        }
        Ok(())
    }

    /// The actor hits the creature; a surviving creature hits back.
    pub fn attack(&mut self, world: &mut World, actor: &mut Actor) -> Result<Vec<CombatEvent>> {
        self.ensure_creature_present(world)?;
        let mut events = Vec::new();

        let damage = actor.stat(keys::DMG)?;
        let creature_health = self.creature.take_damage(damage)?;
        events.push(CombatEvent::ActorStruck {
            damage,
            creature_health,
        });

        if creature_health <= 0 {
            let xp = self.template.stats.int_or(keys::XP, 0)?;
            actor.gain_xp(xp)?;
            for drop in &self.template.drops {
                actor.inventory.add(drop, 1);
            }
            let cell = self.creature.position;
            world.clear_occupant(cell.x as i64, cell.y as i64)?;
            events.push(CombatEvent::Looted {
                xp,
                drops: self.template.drops.clone(),
            });
            self.finish(EncounterState::PlayerVictory, &mut events);
        } else {
            self.creature_strikes(actor, false, &mut events)?;
        }
        Ok(events)
    }

    /// Leave the fight. Nothing else changes.
    pub fn run(&mut self) -> Result<Vec<CombatEvent>> {
        self.ensure_in_combat()?;
        let mut events = Vec::new();
        self.finish(EncounterState::Fled, &mut events);
        Ok(events)
    }

    /// Items the creature will take from an actor standing at `position`, and
    /// the xp paid per item.
    ///
    /// Offers are drawn from `creatures.all_drops()` with a generator seeded
    /// from the position, so every query from the same cell agrees.
    pub fn trade_offers(
        &self,
        position: Position,
        creatures: &dyn CreatureCatalog,
    ) -> Result<(Vec<String>, i64)> {
        self.ensure_in_combat()?;
        let not_tradable = || WorldError::NotTradable(self.creature.name().to_string());
        let (count, xp) = self.template.trade_terms()?.ok_or_else(not_tradable)?;
        let universe = creatures.all_drops();
        if universe.is_empty() {
            return Err(not_tradable());
        }
        let mut rng = seed::make_rng(position, "trade");
        let offers = (0..count)
            .map(|_| universe[rng.random_range(0..universe.len())].clone())
            .collect();
        Ok((offers, xp))
    }

    /// Trade `quantity` of offer number `selection` (zero-based) for xp.
    ///
    /// A bad selection or a short inventory leaves the encounter in combat and
    /// the actor untouched.
    pub fn trade(
        &mut self,
        world: &World,
        actor: &mut Actor,
        creatures: &dyn CreatureCatalog,
        selection: usize,
        quantity: u32,
    ) -> Result<Vec<CombatEvent>> {
        let (offers, xp_each) = self.trade_offers(actor.position, creatures)?;
        let item = offers.get(selection).ok_or_else(|| {
            WorldError::InvalidSelection(format!(
                "offer {} of {}",
                selection + 1,
                offers.len()
            ))
        })?;
        if quantity == 0 {
            return Err(WorldError::InvalidSelection(
                "cannot trade fewer than one item".to_string(),
            ));
        }
        self.ensure_creature_present(world)?;

        actor.inventory.remove(item, quantity)?;
        let xp = xp_each * i64::from(quantity);
        actor.gain_xp(xp)?;

        let mut events = vec![CombatEvent::TradeCompleted {
            item: item.clone(),
            quantity,
            xp,
        }];
        self.finish(EncounterState::Traded, &mut events);
        Ok(events)
    }
}
