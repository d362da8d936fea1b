use crate::constants::*;
use crate::creep::spawning::make_body;
use crate::creep::*;
use crate::prototypes::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

/// One production target: keep `count` units with exactly this body alive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub description: String,
    pub body: Vec<Part>,
    pub count: usize,
}

impl SpawnRequest {
    pub fn new(description: &str, body: Vec<Part>, count: usize) -> SpawnRequest {
        SpawnRequest {
            description: description.to_string(),
            body,
            count,
        }
    }
}

/// Strictly ordered production plan. An entry is only considered once every
/// entry before it is at its target count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnQueue {
    requests: Vec<SpawnRequest>,
}

impl Default for SpawnQueue {
    fn default() -> SpawnQueue {
        SpawnQueue::new(vec![
            SpawnRequest::new("Miner", make_body(MINER_PARTS), MINER_COUNT),
            SpawnRequest::new("Tank", make_body(TANK_PARTS), TANK_COUNT),
            SpawnRequest::new("Infantry", make_body(INFANTRY_PARTS), INFANTRY_COUNT),
        ])
    }
}

impl SpawnQueue {
    pub fn new(requests: Vec<SpawnRequest>) -> SpawnQueue {
        SpawnQueue { requests }
    }

    pub fn requests(&self) -> &[SpawnRequest] {
        &self.requests
    }

    /// First entry below its target count, if any.
    pub fn next_request(&self, my_units: &[Unit]) -> Option<(usize, &SpawnRequest)> {
        self.requests
            .iter()
            .enumerate()
            .find(|(_, request)| count_matching(my_units, &request.body) < request.count)
    }

    /// Issue at most one creation request. Returns the index of the queue
    /// entry that was requested.
    pub fn maybe_produce<I: Intents + ?Sized>(&self, intents: &mut I, spawn: &Spawn, my_units: &[Unit]) -> Option<usize> {
        let (index, request) = self.next_request(my_units)?;

        if spawn.is_spawning() {
            return None;
        }

        match intents.spawn_unit(spawn, &request.body) {
            ActionResult::Ok => {
                info!("[SpawnQueue] Spawning {} ({} parts)", request.description, request.body.len());

                Some(index)
            }
            result => {
                debug!("[SpawnQueue] Spawn of {} not accepted: {:?}", request.description, result);

                None
            }
        }
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::sim::*;
    use proptest::prelude::*;

    fn units_of(bodies: &[(Vec<Part>, usize)]) -> Vec<Unit> {
        let mut next = 0;
        let mut units = Vec::new();

        for (body, count) in bodies {
            for _ in 0..*count {
                next += 1;
                units.push(Unit::new(ObjectId(next), Position::new(next as i32, 0), body.clone(), true));
            }
        }

        units
    }

    fn spawn() -> Spawn {
        Spawn::new(ObjectId(1000), Position::new(0, 0), true)
    }

    #[test]
    fn earlier_entries_first() {
        let queue = SpawnQueue::default();
        let units = units_of(&[(make_body(MINER_PARTS), 1), (make_body(TANK_PARTS), 4)]);
        let mut intents = IntentLog::new();

        assert_eq!(queue.maybe_produce(&mut intents, &spawn(), &units), Some(0));
        assert_eq!(intents.spawn_requests(), vec![make_body(MINER_PARTS)]);
    }

    #[test]
    fn satisfied_entries_are_skipped() {
        let queue = SpawnQueue::default();
        let units = units_of(&[(make_body(MINER_PARTS), 3), (make_body(TANK_PARTS), 9)]);
        let mut intents = IntentLog::new();

        assert_eq!(queue.maybe_produce(&mut intents, &spawn(), &units), Some(2));
        assert_eq!(intents.spawn_requests(), vec![make_body(INFANTRY_PARTS)]);
    }

    #[test]
    fn busy_spawn_requests_nothing() {
        let queue = SpawnQueue::default();
        let mut busy = spawn();
        busy.spawning = Some(Spawning {
            unit: Unit::new(ObjectId(1), busy.pos, make_body(MINER_PARTS), true),
        });
        let mut intents = IntentLog::new();

        assert_eq!(queue.maybe_produce(&mut intents, &busy, &[]), None);
        assert!(intents.is_empty());
    }

    #[test]
    fn complete_plan_requests_nothing() {
        let queue = SpawnQueue::default();
        let units = units_of(&[
            (make_body(MINER_PARTS), 3),
            (make_body(TANK_PARTS), 9),
            (make_body(INFANTRY_PARTS), 5),
        ]);
        let mut intents = IntentLog::new();

        assert_eq!(queue.maybe_produce(&mut intents, &spawn(), &units), None);
        assert!(intents.is_empty());
    }

    #[test]
    fn hybrid_units_do_not_count() {
        let queue = SpawnQueue::new(vec![SpawnRequest::new("Tank", make_body(TANK_PARTS), 1)]);
        let mut hybrid = make_body(TANK_PARTS);
        hybrid.push(Part::Carry);
        let units = units_of(&[(hybrid, 3)]);

        assert_eq!(queue.next_request(&units).map(|(i, _)| i), Some(0));
    }

    proptest! {
        #[test]
        fn prop_at_most_one_request(miners in 0usize..5, tanks in 0usize..12, infantry in 0usize..8) {
            let queue = SpawnQueue::default();
            let units = units_of(&[
                (make_body(MINER_PARTS), miners),
                (make_body(TANK_PARTS), tanks),
                (make_body(INFANTRY_PARTS), infantry),
            ]);
            let mut intents = IntentLog::new();

            queue.maybe_produce(&mut intents, &spawn(), &units);

            prop_assert!(intents.spawn_requests().len() <= 1);
        }
    }
}
