use rand::RngCore;

use super::combat::{CombatEvent, Encounter, EncounterState};
use super::movement::{self, Direction};
use crate::error::{Result, WorldError};
use crate::model::{Actor, BlockCatalog, CreatureCatalog, EMPTY, Position, World, keys};

/// Result of a movement turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub from: Position,
    pub to: Position,
    /// Encounter events if the actor ended up on an occupied cell.
    pub events: Vec<CombatEvent>,
}

/// One actor's turn-by-turn state: the actor, the fight it is in, if any, and
/// whether it has died.
///
/// Every operation borrows the world for the duration of the call only, so a
/// [`SharedWorld`](super::SharedWorld) can hold its lock around each turn.
#[derive(Debug, Clone)]
pub struct Session {
    actor: Actor,
    encounter: Option<Encounter>,
    over: bool,
}

impl Session {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            encounter: None,
            over: false,
        }
    }

    /// A new player on a random open cell, or `None` if the world has none.
    pub fn spawn(
        world: &World,
        blocks: &dyn BlockCatalog,
        name: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Self>> {
        let Some(position) = world.find_open_cell(blocks, rng)? else {
            return Ok(None);
        };
        tracing::info!(name, %position, "player spawned");
        Ok(Some(Self::new(Actor::player(name, position))))
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn into_actor(self) -> Actor {
        self.actor
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    /// True once the actor has died.
    pub fn is_over(&self) -> bool {
        self.over
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.over {
            return Err(WorldError::SessionOver);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<()> {
        self.ensure_alive()?;
        if self.encounter.is_some() {
            return Err(WorldError::EncounterInProgress);
        }
        Ok(())
    }

    fn encounter_mut(&mut self) -> Result<&mut Encounter> {
        self.ensure_alive()?;
        self.encounter.as_mut().ok_or(WorldError::NoEncounter)
    }

    /// Drop a finished encounter and end the session on defeat.
    fn settle(&mut self) {
        let Some(state) = self.encounter.as_ref().map(Encounter::state) else {
            return;
        };
        if !state.is_over() {
            return;
        }
        tracing::debug!(name = self.actor.name(), %state, "encounter over");
        self.encounter = None;
        if state == EncounterState::PlayerDefeat {
            tracing::info!(name = self.actor.name(), position = %self.actor.position, "player died");
            self.over = true;
        }
    }

    /// Move up to `distance` cells, defaulting to the actor's speed, and start
    /// an encounter if the actor stops on a creature.
    pub fn step(
        &mut self,
        world: &World,
        direction: Direction,
        distance: Option<u32>,
        blocks: &dyn BlockCatalog,
        creatures: &dyn CreatureCatalog,
        rng: &mut dyn RngCore,
    ) -> Result<Step> {
        self.ensure_idle()?;
        let speed = self.actor.stat(keys::SPEED)?;
        let requested = distance.map_or(speed, i64::from);
        if requested > speed {
            return Err(WorldError::ExceedsSpeed { requested, speed });
        }

        let from = self.actor.position;
        let to = movement::destination(world, from, direction, requested, blocks, creatures, rng)?;
        let occupied = world.occupant(to)? != EMPTY;
        self.actor.move_to(to);

        let mut events = Vec::new();
        if occupied {
            let (encounter, entry) = match Encounter::begin(world, &mut self.actor, to, creatures) {
                Ok(started) => started,
                Err(err) => {
                    self.actor.move_to(from);
                    return Err(err);
                }
            };
            events = entry;
            self.encounter = Some(encounter);
            self.settle();
        }
        Ok(Step { from, to, events })
    }

    /// Hit the creature being faced. If it is already gone the encounter is
    /// dropped and `NoEncounter` returned.
    pub fn attack(&mut self, world: &mut World) -> Result<Vec<CombatEvent>> {
        self.ensure_alive()?;
        let encounter = self.encounter.as_mut().ok_or(WorldError::NoEncounter)?;
        let result = encounter.attack(world, &mut self.actor);
        self.settle();
        result
    }

    pub fn run(&mut self) -> Result<Vec<CombatEvent>> {
        let events = self.encounter_mut()?.run()?;
        self.settle();
        Ok(events)
    }

    /// Current offers and xp per item from the creature being faced.
    pub fn trade_offers(&self, creatures: &dyn CreatureCatalog) -> Result<(Vec<String>, i64)> {
        self.ensure_alive()?;
        let encounter = self.encounter.as_ref().ok_or(WorldError::NoEncounter)?;
        encounter.trade_offers(self.actor.position, creatures)
    }

    pub fn trade(
        &mut self,
        world: &World,
        creatures: &dyn CreatureCatalog,
        selection: usize,
        quantity: u32,
    ) -> Result<Vec<CombatEvent>> {
        self.ensure_alive()?;
        let encounter = self.encounter.as_mut().ok_or(WorldError::NoEncounter)?;
        let result = encounter.trade(world, &mut self.actor, creatures, selection, quantity);
        self.settle();
        result
    }

    /// Jump straight to `target`, abandoning any encounter.
    pub fn teleport(&mut self, world: &World, target: Position) -> Result<()> {
        self.ensure_alive()?;
        let (x, y) = (target.x as i64, target.y as i64);
        if !world.in_bounds(x, y) {
            return Err(WorldError::OutOfBounds {
                x,
                y,
                extent: world.extent(),
            });
        }
        self.encounter = None;
        self.actor.move_to(target);
        Ok(())
    }

    /// Raise one of the actor's stats by a level. Returns the new derived value.
    pub fn upgrade(&mut self, stat: &str) -> Result<i64> {
        self.ensure_alive()?;
        self.actor.upgrade(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{self, BRUTE, MERCHANT, RAT};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    struct Fixture {
        world: World,
        blocks: crate::model::BlockSet,
        creatures: crate::model::Bestiary,
        rng: SmallRng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: testutil::open_world(10),
                blocks: testutil::blocks(),
                creatures: testutil::creatures(),
                rng: SmallRng::seed_from_u64(0),
            }
        }

        fn step(&mut self, session: &mut Session, direction: Direction, distance: Option<u32>) -> Result<Step> {
            session.step(
                &self.world,
                direction,
                distance,
                &self.blocks,
                &self.creatures,
                &mut self.rng,
            )
        }
    }

    fn session_at(x: usize, y: usize) -> Session {
        Session::new(Actor::player("ada", Position::new(x, y)))
    }

    #[test]
    fn default_distance_is_speed() {
        let mut fx = Fixture::new();
        let mut session = session_at(0, 2);
        let step = fx.step(&mut session, Direction::East, None).unwrap();
        assert_eq!(step.to, Position::new(5, 2));
        assert!(step.events.is_empty());
        assert!(session.encounter().is_none());
    }

    #[test]
    fn too_far_is_rejected_without_moving() {
        let mut fx = Fixture::new();
        let mut session = session_at(0, 2);
        assert!(matches!(
            fx.step(&mut session, Direction::East, Some(6)),
            Err(WorldError::ExceedsSpeed { requested: 6, speed: 5 })
        ));
        assert_eq!(session.actor().position, Position::new(0, 2));

        session.upgrade(keys::SPEED).unwrap();
        let step = fx.step(&mut session, Direction::East, Some(6)).unwrap();
        assert_eq!(step.to, Position::new(6, 2));
    }

    #[test]
    fn stopping_on_a_creature_starts_a_fight() {
        let mut fx = Fixture::new();
        fx.world.set_occupant(6, 5, RAT).unwrap();
        let mut session = session_at(5, 5);
        let step = fx.step(&mut session, Direction::East, Some(3)).unwrap();
        assert_eq!(step.to, Position::new(6, 5));
        assert!(matches!(step.events[0], CombatEvent::Encountered { .. }));
        assert!(session.encounter().is_some());

        assert!(matches!(
            fx.step(&mut session, Direction::West, Some(1)),
            Err(WorldError::EncounterInProgress)
        ));

        session.attack(&mut fx.world).unwrap();
        assert!(session.encounter().is_none());
        assert_eq!(fx.world.occupant_at(6, 5).unwrap(), EMPTY);
        assert_eq!(session.actor().stat(keys::XP).unwrap(), 5);
    }

    #[test]
    fn failed_encounter_start_leaves_the_actor_in_place() {
        let mut fx = Fixture::new();
        fx.world.set_occupant(6, 5, 42).unwrap();
        let mut session = session_at(5, 5);
        assert!(matches!(
            fx.step(&mut session, Direction::East, Some(1)),
            Err(WorldError::UnknownCreatureType(42))
        ));
        assert_eq!(session.actor().position, Position::new(5, 5));
        assert!(session.encounter().is_none());
    }

    #[test]
    fn attacking_a_creature_killed_by_someone_else_ends_the_fight() {
        let mut fx = Fixture::new();
        fx.world.set_occupant(6, 5, RAT).unwrap();
        let mut first = session_at(5, 5);
        let mut second = session_at(7, 5);
        fx.step(&mut first, Direction::East, Some(1)).unwrap();
        fx.step(&mut second, Direction::West, Some(1)).unwrap();

        first.attack(&mut fx.world).unwrap();
        assert!(matches!(second.attack(&mut fx.world), Err(WorldError::NoEncounter)));
        assert!(second.encounter().is_none());
        assert!(!second.is_over());
        assert_eq!(second.actor().stat(keys::XP).unwrap(), 0);
        assert_eq!(second.actor().inventory.count("tail"), 0);
    }

    #[test]
    fn dying_ends_the_session() {
        let mut fx = Fixture::new();
        fx.world.set_occupant(3, 3, BRUTE).unwrap();
        let mut session = session_at(3, 3);
        session.teleport(&fx.world, Position::new(3, 2)).unwrap();
        fx.step(&mut session, Direction::South, Some(1)).unwrap();

        let mut rounds = 0;
        while !session.is_over() {
            session.attack(&mut fx.world).unwrap();
            rounds += 1;
            assert!(rounds < 10);
        }
        assert!(session.actor().is_dead().unwrap());
        assert!(session.encounter().is_none());
        assert!(matches!(session.attack(&mut fx.world), Err(WorldError::SessionOver)));
        assert!(matches!(session.upgrade(keys::DMG), Err(WorldError::SessionOver)));
        assert_eq!(fx.world.occupant_at(3, 3).unwrap(), BRUTE);
    }

    #[test]
    fn combat_commands_need_an_encounter() {
        let mut fx = Fixture::new();
        let mut session = session_at(1, 1);
        assert!(matches!(session.attack(&mut fx.world), Err(WorldError::NoEncounter)));
        assert!(matches!(session.run(), Err(WorldError::NoEncounter)));
        assert!(matches!(
            session.trade_offers(&fx.creatures),
            Err(WorldError::NoEncounter)
        ));
    }

    #[test]
    fn trading_returns_to_idle() {
        let mut fx = Fixture::new();
        fx.world.set_occupant(2, 1, MERCHANT).unwrap();
        let mut session = session_at(1, 1);
        fx.step(&mut session, Direction::East, Some(1)).unwrap();
        assert!(session.encounter().is_some());

        let (offers, _) = session.trade_offers(&fx.creatures).unwrap();
        assert!(session.trade(&fx.world, &fx.creatures, 0, 1).is_err());
        assert!(session.encounter().is_some());

        let mut actor = session.clone().into_actor();
        actor.inventory.add(&offers[0], 1);
        let mut session = Session::new(actor);
        session.teleport(&fx.world, Position::new(1, 1)).unwrap();
        fx.step(&mut session, Direction::East, Some(1)).unwrap();
        session.trade(&fx.world, &fx.creatures, 0, 1).unwrap();
        assert!(session.encounter().is_none());
        assert_eq!(session.actor().stat(keys::XP).unwrap(), 4);
        assert_eq!(fx.world.occupant_at(2, 1).unwrap(), MERCHANT);
    }

    #[test]
    fn teleport_checks_bounds_and_drops_the_fight() {
        let mut fx = Fixture::new();
        fx.world.set_occupant(6, 5, RAT).unwrap();
        let mut session = session_at(5, 5);
        fx.step(&mut session, Direction::East, Some(1)).unwrap();
        assert!(session.encounter().is_some());

        assert!(matches!(
            session.teleport(&fx.world, Position::new(10, 0)),
            Err(WorldError::OutOfBounds { .. })
        ));
        session.teleport(&fx.world, Position::new(0, 0)).unwrap();
        assert!(session.encounter().is_none());
        assert_eq!(session.actor().position, Position::new(0, 0));
    }

    #[test]
    fn spawn_lands_on_open_ground() {
        let fx = Fixture::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let session = Session::spawn(&fx.world, &fx.blocks, "ada", &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(session.actor().name(), "ada");

        let walls = World::new(4, testutil::WALL);
        assert!(Session::spawn(&walls, &fx.blocks, "ada", &mut rng).unwrap().is_none());
    }
}
