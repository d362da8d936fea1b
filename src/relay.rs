use crate::findnearest::*;
use crate::prototypes::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayMode {
    /// Every harvester shuttles between container and spawn on its own.
    Independent,
    /// Harvesters stand on the route and hand energy down the line.
    Relay,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReport {
    pub mode: RelayMode,
    pub container: ObjectId,
    pub route_length: usize,
    /// Harvesters with a station this tick (relay mode only).
    pub stations: usize,
}

/// Relay needs one harvester per step of the route, not counting the step
/// onto the container itself. Routes of length one have no stations and
/// always shuttle.
pub fn select_relay_mode(harvester_count: usize, route_length: usize) -> RelayMode {
    if route_length <= 1 || harvester_count < route_length - 1 {
        RelayMode::Independent
    } else {
        RelayMode::Relay
    }
}

/// Stations ordered from the container towards the spawn. The container tile
/// is dropped.
pub fn relay_stations(route: &Path) -> Vec<Position> {
    let mut stations = route.positions.clone();

    stations.pop();
    stations.reverse();

    stations
}

pub fn drive_independent<I: Intents + ?Sized>(intents: &mut I, spawn: &Spawn, container: &Container, harvesters: &[&Unit]) {
    let spawn_target = Target::of(spawn);

    for harvester in harvesters {
        if harvester.energy == 0 {
            if intents.withdraw(harvester, container) == ActionResult::NotInRange {
                intents.move_to(harvester, container.pos);
            }
        } else if intents.transfer(harvester, &spawn_target) == ActionResult::NotInRange {
            intents.move_to(harvester, spawn.pos);
        }
    }
}

/// Harvester `i` holds station `i`. The head withdraws, every link passes to
/// the next one and the tail feeds the spawn. Returns the number of stations
/// manned.
pub fn drive_relay<I: Intents + ?Sized>(
    intents: &mut I,
    spawn: &Spawn,
    container: &Container,
    harvesters: &[&Unit],
    stations: &[Position],
) -> usize {
    let manned = stations.len().min(harvesters.len());

    for (i, station) in stations.iter().take(manned).enumerate() {
        let harvester = harvesters[i];

        intents.move_to(harvester, *station);

        if i == 0 {
            intents.withdraw(harvester, container);
        }

        let receiver = if i + 1 < manned {
            Target::of(harvesters[i + 1])
        } else {
            Target::of(spawn)
        };

        intents.transfer(harvester, &receiver);
    }

    if harvesters.len() > manned {
        debug!("[Relay] {} harvesters without a station", harvesters.len() - manned);
    }

    manned
}

/// Pick the container closest to the spawn by path and move its energy home,
/// choosing the transport mode from harvester count and route length.
pub fn plan_and_drive_relay<W, I>(
    world: &W,
    intents: &mut I,
    spawn: &Spawn,
    containers: &[Container],
    harvesters: &[&Unit],
    relay_enabled: bool,
) -> Option<RelayReport>
where
    W: World + ?Sized,
    I: Intents + ?Sized,
{
    if harvesters.is_empty() {
        return None;
    }

    let (container, route) = match containers
        .iter()
        .find_nearest_path_from(spawn.pos, |start, end| world.search_path(start, end))
    {
        Some(nearest) => nearest,
        None => {
            debug!("[Relay] No reachable container for {} harvesters", harvesters.len());
            return None;
        }
    };

    let mode = if relay_enabled {
        select_relay_mode(harvesters.len(), route.len())
    } else {
        RelayMode::Independent
    };

    let stations = match mode {
        RelayMode::Independent => {
            drive_independent(intents, spawn, container, harvesters);
            0
        }
        RelayMode::Relay => drive_relay(intents, spawn, container, harvesters, &relay_stations(&route)),
    };

    Some(RelayReport {
        mode,
        container: container.id,
        route_length: route.len(),
        stations,
    })
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::creep::spawning::make_body;
    use crate::sim::*;
    use proptest::prelude::*;

    /// Spawn at the origin with a container `distance` tiles east.
    fn mining_world(distance: i32) -> SimWorld {
        let mut world = SimWorld::new(40, 40);
        world.add_spawn(Position::new(0, 0), true);
        world.add_container(Position::new(distance, 0), 1000);
        world
    }

    fn add_miners(world: &mut SimWorld, positions: &[Position]) -> Vec<ObjectId> {
        positions
            .iter()
            .map(|pos| world.add_unit(*pos, make_body(MINER_PARTS), true))
            .collect()
    }

    fn run(world: &SimWorld, ids: &[ObjectId]) -> (Option<RelayReport>, IntentLog) {
        let units: Vec<Unit> = ids.iter().filter_map(|id| world.get_unit(*id)).collect();
        let harvesters: Vec<&Unit> = units.iter().collect();
        let mut intents = IntentLog::new();

        let report = plan_and_drive_relay(world, &mut intents, &world.spawns[0], &world.containers, &harvesters, true);

        (report, intents)
    }

    #[test]
    fn mode_boundaries() {
        assert_eq!(select_relay_mode(3, 5), RelayMode::Independent);
        assert_eq!(select_relay_mode(4, 5), RelayMode::Relay);
        assert_eq!(select_relay_mode(9, 5), RelayMode::Relay);
        assert_eq!(select_relay_mode(5, 1), RelayMode::Independent);
    }

    #[test]
    fn stations_run_from_container_to_spawn() {
        let world = mining_world(5);
        let route = world.search_path(Position::new(0, 0), Position::new(5, 0));

        assert_eq!(
            relay_stations(&route),
            vec![Position::new(4, 0), Position::new(3, 0), Position::new(2, 0), Position::new(1, 0)]
        );
    }

    #[test]
    fn four_harvesters_on_five_step_route_relay() {
        let mut world = mining_world(5);
        let ids = add_miners(
            &mut world,
            &[Position::new(4, 0), Position::new(3, 0), Position::new(2, 0), Position::new(1, 0)],
        );
        world.unit_mut(ids[2]).unwrap().energy = 50;

        let (report, intents) = run(&world, &ids);
        let report = report.unwrap();

        assert_eq!(report.mode, RelayMode::Relay);
        assert_eq!(report.route_length, 5);
        assert_eq!(report.stations, 4);
        assert_eq!(intents.withdraws_by(ids[0]), vec![world.containers[0].id]);
        assert!(intents.withdraws_by(ids[1]).is_empty());
        assert_eq!(intents.transfer_requests_by(ids[2]), vec![(ids[3], ActionResult::Ok)]);
        assert_eq!(intents.transfer_requests_by(ids[3]).first().map(|t| t.0), Some(world.spawns[0].id));
    }

    #[test]
    fn three_harvesters_on_five_step_route_shuttle() {
        let mut world = mining_world(5);
        let ids = add_miners(&mut world, &[Position::new(4, 1), Position::new(2, 2), Position::new(1, 1)]);
        world.unit_mut(ids[1]).unwrap().energy = 50;

        let (report, intents) = run(&world, &ids);

        assert_eq!(report.map(|r| r.mode), Some(RelayMode::Independent));
        // Adjacent to the container: withdraws in place.
        assert_eq!(intents.withdraws_by(ids[0]), vec![world.containers[0].id]);
        assert!(intents.moves_by(ids[0]).is_empty());
        // Loaded and away from the spawn: heads home.
        assert_eq!(intents.moves_by(ids[1]), vec![Position::new(0, 0)]);
        // Empty and far from the container: heads out.
        assert_eq!(intents.moves_by(ids[2]), vec![Position::new(5, 0)]);
    }

    #[test]
    fn nearest_container_by_path_is_used() {
        let mut world = mining_world(8);
        let near = world.add_container(Position::new(0, 3), 1000);
        let ids = add_miners(&mut world, &[Position::new(10, 10)]);

        let (report, _) = run(&world, &ids);

        assert_eq!(report.map(|r| r.container), Some(near));
    }

    #[test]
    fn adjacent_container_shuttles() {
        let mut world = mining_world(1);
        let ids = add_miners(&mut world, &[Position::new(1, 1), Position::new(0, 1)]);

        let (report, intents) = run(&world, &ids);

        assert_eq!(report.map(|r| r.mode), Some(RelayMode::Independent));
        assert_eq!(intents.withdraws_by(ids[0]).len(), 1);
    }

    #[test]
    fn nothing_to_do() {
        let world = mining_world(5);
        assert!(run(&world, &[]).0.is_none());

        let mut world = SimWorld::new(10, 10);
        world.add_spawn(Position::new(0, 0), true);
        let ids = add_miners(&mut world, &[Position::new(3, 3)]);
        let (report, intents) = run(&world, &ids);
        assert!(report.is_none());
        assert!(intents.is_empty());
    }

    #[test]
    fn relay_can_be_disabled() {
        let mut world = mining_world(3);
        let ids = add_miners(&mut world, &[Position::new(5, 5), Position::new(6, 6), Position::new(7, 7)]);
        let units: Vec<Unit> = ids.iter().filter_map(|id| world.get_unit(*id)).collect();
        let harvesters: Vec<&Unit> = units.iter().collect();

        let report = plan_and_drive_relay(&world, &mut IntentLog::new(), &world.spawns[0], &world.containers, &harvesters, false);

        assert_eq!(report.map(|r| r.mode), Some(RelayMode::Independent));
    }

    proptest! {
        /// With exactly one harvester per station every station is manned by
        /// exactly one harvester.
        #[test]
        fn prop_exact_crew_is_a_bijection(distance in 2i32..30) {
            let mut world = mining_world(distance);
            let parking: Vec<Position> = (0..distance - 1).map(|i| Position::new(i, 20)).collect();
            let ids = add_miners(&mut world, &parking);

            let (report, intents) = run(&world, &ids);
            let report = report.unwrap();

            prop_assert_eq!(report.mode, RelayMode::Relay);
            prop_assert_eq!(report.stations, ids.len());

            let route = world.search_path(Position::new(0, 0), Position::new(distance, 0));
            let stations = relay_stations(&route);

            let assigned: Vec<Position> = ids.iter().flat_map(|id| intents.moves_by(*id)).collect();
            prop_assert_eq!(assigned, stations);
        }

        #[test]
        fn prop_mode_threshold(harvesters in 0usize..50, route_length in 2usize..50) {
            let mode = select_relay_mode(harvesters, route_length);

            prop_assert_eq!(mode == RelayMode::Relay, harvesters >= route_length - 1);
        }
    }
}
