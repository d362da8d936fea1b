use crate::constants::*;
use crate::creep::spawning::make_body;
use crate::creep::*;
use crate::features::*;
use crate::military::squad::*;
use crate::prototypes::*;
use crate::relay::*;
use crate::roster::*;
use crate::serialize::*;
use crate::spawnsystem::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Everything read from the world at the start of a tick.
pub struct Snapshot {
    pub home: Option<Spawn>,
    pub enemy_spawn: Option<Spawn>,
    /// Containers with energy left in them.
    pub containers: Vec<Container>,
    pub my_units: Vec<Unit>,
    pub hostiles: Vec<Unit>,
}

impl Snapshot {
    pub fn gather<W: World + ?Sized>(world: &W) -> Snapshot {
        let spawns = world.spawns();

        let home = spawns.iter().find(|spawn| spawn.my).cloned();
        let enemy_spawn = spawns.iter().find(|spawn| !spawn.my).cloned();

        let containers = world.containers().into_iter().filter(|container| container.energy > 0).collect();

        let (my_units, hostiles): (Vec<Unit>, Vec<Unit>) = world
            .units()
            .into_iter()
            .filter(|unit| unit.exists)
            .partition(|unit| unit.my);

        Snapshot {
            home,
            enemy_spawn,
            containers,
            my_units,
            hostiles,
        }
    }
}

/// What one tick decided, logged at debug level and returned to the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    pub harvesters: usize,
    pub fighters: usize,
    /// Index of the production queue entry requested this tick.
    pub spawned: Option<usize>,
    pub relay: Option<RelayReport>,
    pub squads: Vec<SquadReport>,
    /// Accepted attacks when running the swarm strategy.
    pub swarm_engaged: Option<usize>,
    pub ledger_length: usize,
}

/// State that outlives a tick. Hosts that restart between ticks save it with
/// `Controller::save_state` and hand it back through `Controller::load_state`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub ledger: RosterLedger,
    pub queue: SpawnQueue,
}

pub struct Controller {
    features: Features,
    ledger: RosterLedger,
    harvester_body: Vec<Part>,
}

impl Default for Controller {
    fn default() -> Controller {
        Controller::new(Features::default())
    }
}

impl Controller {
    pub fn new(features: Features) -> Controller {
        Controller::with_ledger(features, RosterLedger::new())
    }

    pub fn with_ledger(features: Features, ledger: RosterLedger) -> Controller {
        Controller {
            features,
            ledger,
            harvester_body: make_body(MINER_PARTS),
        }
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn ledger(&self) -> &RosterLedger {
        &self.ledger
    }

    pub fn save_state(&self) -> Result<String, String> {
        let state = ControllerState {
            ledger: self.ledger.clone(),
            queue: self.features.spawning.queue.clone(),
        };

        encode_to_string(&state)
    }

    /// Replace the ledger and queue with a saved copy. On failure the current
    /// state is kept.
    pub fn load_state(&mut self, data: &str) -> Result<(), String> {
        let state: ControllerState = decode_from_string(data)?;

        info!("[Controller] Loaded state with {} recorded fighters", state.ledger.len());

        self.ledger = state.ledger;
        self.features.spawning.queue = state.queue;

        Ok(())
    }

    pub fn tick<W, I>(&mut self, world: &W, intents: &mut I) -> TickSummary
    where
        W: World + ?Sized,
        I: Intents + ?Sized,
    {
        let snapshot = Snapshot::gather(world);

        let home = match &snapshot.home {
            Some(home) => home,
            None => {
                warn!("[Controller] No friendly spawn, skipping tick");
                return TickSummary {
                    ledger_length: self.ledger.len(),
                    ..TickSummary::default()
                };
            }
        };

        let resolved = self.ledger.record_and_resolve(world, home);

        let groups = UnitGroups::classify(&snapshot.my_units, &self.harvester_body);

        let spawned = if self.features.spawning.enabled {
            self.features.spawning.queue.maybe_produce(intents, home, &snapshot.my_units)
        } else {
            None
        };

        //
        // NOTE: A harvester still in production is standing on the spawn and
        //       cannot act, so it neither mans a station nor shuttles.
        //

        let harvesters: Vec<&Unit> = groups.harvesters.iter().copied().filter(|unit| !unit.spawning).collect();

        let relay = plan_and_drive_relay(world, intents, home, &snapshot.containers, &harvesters, self.features.mining.relay);

        let roster = if self.features.combat.ledger_ordered_roster {
            ordered_roster(resolved, &groups.fighters)
        } else {
            groups.fighters.iter().map(|unit| (*unit).clone()).collect()
        };

        let field = Battlefield {
            home,
            enemy_spawn: snapshot.enemy_spawn.as_ref(),
            hostiles: &snapshot.hostiles,
        };

        let (squads, swarm_engaged) = match self.features.combat.strategy {
            CombatStrategy::Squads => {
                let settings = self.features.combat.squad_settings();

                (run_squads(world, intents, &roster, &field, &settings), None)
            }
            CombatStrategy::Swarm => (Vec::new(), Some(run_swarm(world, intents, &roster, &field))),
        };

        let summary = TickSummary {
            harvesters: harvesters.len(),
            fighters: roster.len(),
            spawned,
            relay,
            squads,
            swarm_engaged,
            ledger_length: self.ledger.len(),
        };

        if log_enabled!(Level::Debug) {
            match serde_json::to_string(&summary) {
                Ok(data) => debug!("[Controller] Tick summary: {}", data),
                Err(e) => warn!("[Controller] Failed to serialize tick summary: {}", e),
            }
        }

        summary
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::sim::*;

    #[test]
    fn no_friendly_spawn_does_nothing() {
        let mut world = SimWorld::new(20, 20);
        world.add_spawn(Position::new(10, 10), false);
        world.add_unit(Position::new(1, 1), make_body(TANK_PARTS), true);

        let mut controller = Controller::default();
        let mut intents = IntentLog::new();

        let summary = controller.tick(&world, &mut intents);

        assert_eq!(summary, TickSummary::default());
        assert!(intents.is_empty());
    }

    #[test]
    fn snapshot_skips_empty_containers() {
        let mut world = SimWorld::new(20, 20);
        world.add_spawn(Position::new(0, 0), true);
        world.add_container(Position::new(3, 3), 0);
        let full = world.add_container(Position::new(4, 4), 100);
        world.add_unit(Position::new(5, 5), make_body(TANK_PARTS), false);

        let snapshot = Snapshot::gather(&world);

        assert_eq!(snapshot.containers.iter().map(|c| c.id).collect::<Vec<_>>(), vec![full]);
        assert_eq!(snapshot.hostiles.len(), 1);
        assert!(snapshot.my_units.is_empty());
        assert!(snapshot.enemy_spawn.is_none());
    }

    #[test]
    fn disabled_spawning_requests_nothing() {
        let mut world = SimWorld::new(20, 20);
        world.add_spawn(Position::new(0, 0), true);

        let mut features = Features::default();
        features.spawning.enabled = false;

        let mut controller = Controller::new(features);
        let mut intents = IntentLog::new();

        let summary = controller.tick(&world, &mut intents);

        assert_eq!(summary.spawned, None);
        assert!(intents.spawn_requests().is_empty());
    }

    #[test]
    fn first_tick_requests_a_miner() {
        let mut world = SimWorld::new(20, 20);
        world.add_spawn(Position::new(0, 0), true);

        let mut controller = Controller::default();
        let mut intents = IntentLog::new();

        let summary = controller.tick(&world, &mut intents);

        assert_eq!(summary.spawned, Some(0));
        assert_eq!(intents.spawn_requests(), vec![make_body(MINER_PARTS)]);
    }

    #[test]
    fn spawning_harvester_is_not_driven() {
        let mut world = SimWorld::new(20, 20);
        let spawn = world.add_spawn(Position::new(0, 0), true);
        world.add_container(Position::new(0, 5), 500);
        let miner = world.begin_spawning(spawn, make_body(MINER_PARTS)).unwrap();

        let mut controller = Controller::default();
        let mut intents = IntentLog::new();

        let summary = controller.tick(&world, &mut intents);

        assert_eq!(summary.harvesters, 0);
        assert_eq!(summary.relay, None);
        assert!(intents.moves_by(miner).is_empty());
    }

    #[test]
    fn state_survives_save_and_load() {
        let mut world = SimWorld::new(20, 20);
        let spawn = world.add_spawn(Position::new(0, 0), true);
        world.begin_spawning(spawn, make_body(TANK_PARTS));

        let mut controller = Controller::default();
        controller.tick(&world, &mut IntentLog::new());
        assert_eq!(controller.ledger().len(), 1);

        let saved = controller.save_state().unwrap();

        let mut restored = Controller::default();
        restored.load_state(&saved).unwrap();

        assert_eq!(restored.ledger(), controller.ledger());
        assert_eq!(restored.features().spawning.queue, SpawnQueue::default());
    }

    #[test]
    fn bad_state_keeps_current() {
        let mut controller = Controller::with_ledger(Features::default(), RosterLedger::new());

        assert!(controller.load_state("garbage").is_err());
        assert!(controller.ledger().is_empty());
    }
}
