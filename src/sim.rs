//! Grid arena host used to drive the controller offline.
//!
//! `SimWorld` answers world queries, `IntentLog` records and validates action
//! requests the way the live game reports them, and `SimWorld::apply` plays a
//! tick's intents forward so several ticks can be chained.

use crate::prototypes::*;
use crate::world::*;
use log::*;
use pathfinding::prelude::bfs;
use std::collections::HashSet;

pub const MELEE_RANGE: u32 = 1;
pub const RANGED_RANGE: u32 = 3;
pub const TRANSFER_RANGE: u32 = 1;
pub const CARRY_CAPACITY: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Move { unit: ObjectId, pos: Position },
    Attack { unit: ObjectId, target: ObjectId },
    RangedAttack { unit: ObjectId, target: ObjectId },
    Withdraw { unit: ObjectId, container: ObjectId },
    Transfer { unit: ObjectId, target: ObjectId },
    SpawnUnit { spawn: ObjectId, body: Vec<Part> },
}

/// Records every accepted or rejected request in issue order.
#[derive(Default)]
pub struct IntentLog {
    intents: Vec<(Intent, ActionResult)>,
}

impl IntentLog {
    pub fn new() -> IntentLog {
        IntentLog::default()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn intents(&self) -> &[(Intent, ActionResult)] {
        &self.intents
    }

    fn accepted(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter().filter(|(_, result)| result.is_ok()).map(|(intent, _)| intent)
    }

    pub fn moves_by(&self, id: ObjectId) -> Vec<Position> {
        self.accepted()
            .filter_map(|intent| match intent {
                Intent::Move { unit, pos } if *unit == id => Some(*pos),
                _ => None,
            })
            .collect()
    }

    pub fn attacks_by(&self, id: ObjectId) -> Vec<ObjectId> {
        self.accepted()
            .filter_map(|intent| match intent {
                Intent::Attack { unit, target } if *unit == id => Some(*target),
                _ => None,
            })
            .collect()
    }

    pub fn ranged_attacks_by(&self, id: ObjectId) -> Vec<ObjectId> {
        self.accepted()
            .filter_map(|intent| match intent {
                Intent::RangedAttack { unit, target } if *unit == id => Some(*target),
                _ => None,
            })
            .collect()
    }

    pub fn withdraws_by(&self, id: ObjectId) -> Vec<ObjectId> {
        self.accepted()
            .filter_map(|intent| match intent {
                Intent::Withdraw { unit, container } if *unit == id => Some(*container),
                _ => None,
            })
            .collect()
    }

    /// Transfers requested by `id`, including ones rejected for range or an
    /// empty store.
    pub fn transfer_requests_by(&self, id: ObjectId) -> Vec<(ObjectId, ActionResult)> {
        self.intents
            .iter()
            .filter_map(|(intent, result)| match intent {
                Intent::Transfer { unit, target } if *unit == id => Some((*target, *result)),
                _ => None,
            })
            .collect()
    }

    pub fn spawn_requests(&self) -> Vec<Vec<Part>> {
        self.accepted()
            .filter_map(|intent| match intent {
                Intent::SpawnUnit { body, .. } => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, intent: Intent, result: ActionResult) -> ActionResult {
        self.intents.push((intent, result));

        result
    }

    fn ranged(from: Position, to: Position, range: u32) -> ActionResult {
        if from.in_range_to(to, range) {
            ActionResult::Ok
        } else {
            ActionResult::NotInRange
        }
    }
}

impl Intents for IntentLog {
    fn move_to(&mut self, unit: &Unit, pos: Position) -> ActionResult {
        let result = if unit.pos == pos {
            ActionResult::NotApplicable
        } else {
            ActionResult::Ok
        };

        self.record(Intent::Move { unit: unit.id, pos }, result)
    }

    fn attack(&mut self, unit: &Unit, target: &Target) -> ActionResult {
        let result = IntentLog::ranged(unit.pos, target.pos, MELEE_RANGE);

        self.record(Intent::Attack { unit: unit.id, target: target.id }, result)
    }

    fn ranged_attack(&mut self, unit: &Unit, target: &Target) -> ActionResult {
        let result = IntentLog::ranged(unit.pos, target.pos, RANGED_RANGE);

        self.record(Intent::RangedAttack { unit: unit.id, target: target.id }, result)
    }

    fn withdraw(&mut self, unit: &Unit, container: &Container) -> ActionResult {
        let result = if container.energy == 0 {
            ActionResult::NotApplicable
        } else {
            IntentLog::ranged(unit.pos, container.pos, TRANSFER_RANGE)
        };

        self.record(
            Intent::Withdraw {
                unit: unit.id,
                container: container.id,
            },
            result,
        )
    }

    fn transfer(&mut self, unit: &Unit, target: &Target) -> ActionResult {
        let result = if unit.energy == 0 {
            ActionResult::NotApplicable
        } else {
            IntentLog::ranged(unit.pos, target.pos, TRANSFER_RANGE)
        };

        self.record(Intent::Transfer { unit: unit.id, target: target.id }, result)
    }

    fn spawn_unit(&mut self, spawn: &Spawn, body: &[Part]) -> ActionResult {
        let result = if spawn.is_spawning() || body.is_empty() {
            ActionResult::NotApplicable
        } else {
            ActionResult::Ok
        };

        self.record(
            Intent::SpawnUnit {
                spawn: spawn.id,
                body: body.to_vec(),
            },
            result,
        )
    }
}

/// Square grid with walls. Spawns block movement, containers and units do not.
pub struct SimWorld {
    pub width: i32,
    pub height: i32,
    pub walls: HashSet<Position>,
    pub spawns: Vec<Spawn>,
    pub containers: Vec<Container>,
    pub units: Vec<Unit>,
    next_id: u32,
}

impl SimWorld {
    pub fn new(width: i32, height: i32) -> SimWorld {
        SimWorld {
            width,
            height,
            walls: HashSet::new(),
            spawns: Vec::new(),
            containers: Vec::new(),
            units: Vec::new(),
            next_id: 1,
        }
    }

    pub fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);

        self.next_id += 1;

        id
    }

    pub fn add_spawn(&mut self, pos: Position, my: bool) -> ObjectId {
        let id = self.next_id();
        self.spawns.push(Spawn::new(id, pos, my));
        id
    }

    pub fn add_container(&mut self, pos: Position, energy: u32) -> ObjectId {
        let id = self.next_id();
        self.containers.push(Container { id, pos, energy });
        id
    }

    pub fn add_unit(&mut self, pos: Position, body: Vec<Part>, my: bool) -> ObjectId {
        let id = self.next_id();
        self.units.push(Unit::new(id, pos, body, my));
        id
    }

    /// Start producing a unit at the spawn. The unit is visible immediately,
    /// flagged as spawning, like the live game does.
    pub fn begin_spawning(&mut self, spawn_id: ObjectId, body: Vec<Part>) -> Option<ObjectId> {
        let id = self.next_id();
        let spawn = self.spawns.iter_mut().find(|s| s.id == spawn_id)?;

        if spawn.spawning.is_some() {
            return None;
        }

        let mut unit = Unit::new(id, spawn.pos, body, spawn.my);
        unit.spawning = true;

        spawn.spawning = Some(Spawning { unit: unit.clone() });
        self.units.push(unit);

        Some(id)
    }

    /// Finish whatever the spawn is producing and step the unit off the spawn.
    pub fn finish_spawning(&mut self, spawn_id: ObjectId) {
        let spawn = match self.spawns.iter_mut().find(|s| s.id == spawn_id) {
            Some(spawn) => spawn,
            None => return,
        };

        if let Some(spawning) = spawn.spawning.take() {
            let exit = spawn.pos.offset(0, 1);
            if let Some(unit) = self.units.iter_mut().find(|u| u.id == spawning.unit.id) {
                unit.spawning = false;
                unit.pos = exit;
            }
        }
    }

    pub fn kill(&mut self, id: ObjectId) {
        self.units.retain(|u| u.id != id);
    }

    pub fn unit_mut(&mut self, id: ObjectId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn walkable(&self, pos: Position, goal: Position) -> bool {
        if pos == goal {
            return self.in_bounds(pos);
        }

        self.in_bounds(pos) && !self.walls.contains(&pos) && !self.spawns.iter().any(|s| s.pos == pos)
    }

    fn neighbours(&self, pos: Position, goal: Position) -> Vec<Position> {
        let mut result = Vec::with_capacity(8);

        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }

                let next = pos.offset(dx, dy);

                if self.walkable(next, goal) {
                    result.push(next);
                }
            }
        }

        result
    }

    /// Play one tick's accepted intents forward: one step per move, full
    /// stores on withdraw, whole stores on transfer, queued spawns begin.
    pub fn apply(&mut self, log: &IntentLog) {
        for (intent, result) in log.intents() {
            if !result.is_ok() {
                continue;
            }

            match intent {
                Intent::Move { unit, pos } => {
                    let from = match self.get_unit(*unit) {
                        Some(u) => u.pos,
                        None => continue,
                    };

                    let path = self.search_path(from, *pos);

                    if let Some(step) = path.positions.first().copied() {
                        if let Some(u) = self.unit_mut(*unit) {
                            u.pos = step;
                        }
                    }
                }
                Intent::Withdraw { unit, container } => {
                    let capacity = match self.get_unit(*unit) {
                        Some(u) => u.body.iter().filter(|p| **p == Part::Carry).count() as u32 * CARRY_CAPACITY,
                        None => continue,
                    };

                    let free = match self.get_unit(*unit) {
                        Some(u) => capacity.saturating_sub(u.energy),
                        None => continue,
                    };

                    if let Some(c) = self.containers.iter_mut().find(|c| c.id == *container) {
                        let amount = free.min(c.energy);
                        c.energy -= amount;

                        if let Some(u) = self.unit_mut(*unit) {
                            u.energy += amount;
                        }
                    }
                }
                Intent::Transfer { unit, target } => {
                    let amount = match self.unit_mut(*unit) {
                        Some(u) => std::mem::take(&mut u.energy),
                        None => continue,
                    };

                    if let Some(receiver) = self.unit_mut(*target) {
                        receiver.energy += amount;
                    } else if self.spawns.iter().any(|s| s.id == *target) {
                        debug!("Spawn {} received {} energy", target, amount);
                    }
                }
                Intent::SpawnUnit { spawn, body } => {
                    self.begin_spawning(*spawn, body.clone());
                }
                Intent::Attack { .. } | Intent::RangedAttack { .. } => {}
            }
        }
    }
}

impl World for SimWorld {
    fn spawns(&self) -> Vec<Spawn> {
        self.spawns.clone()
    }

    fn containers(&self) -> Vec<Container> {
        self.containers.clone()
    }

    fn units(&self) -> Vec<Unit> {
        self.units.clone()
    }

    fn get_unit(&self, id: ObjectId) -> Option<Unit> {
        self.units.iter().find(|u| u.id == id).cloned()
    }

    fn search_path(&self, from: Position, to: Position) -> Path {
        if from == to {
            return Path::default();
        }

        match bfs(&from, |pos| self.neighbours(*pos, to), |pos| *pos == to) {
            Some(mut nodes) => {
                nodes.remove(0);

                Path {
                    positions: nodes,
                    incomplete: false,
                }
            }
            None => Path {
                positions: Vec::new(),
                incomplete: true,
            },
        }
    }
}
