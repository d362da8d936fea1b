use crate::prototypes::*;
use serde::{Deserialize, Serialize};

/// Outcome of a single action request. The host applies accepted requests at
/// the end of the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    Ok,
    /// Valid request, but the unit must get closer first.
    NotInRange,
    /// Nothing was requested (missing part, empty store, busy spawn...).
    NotApplicable,
}

impl ActionResult {
    pub fn is_ok(self) -> bool {
        self == ActionResult::Ok
    }
}

/// Result of a path search. Positions exclude the start and include the goal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    pub positions: Vec<Position>,
    /// Set when the goal could not be reached; `positions` is then partial.
    pub incomplete: bool,
}

impl Path {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// A path that actually arrives somewhere.
    pub fn is_usable(&self) -> bool {
        !self.incomplete && !self.positions.is_empty()
    }
}

/// Read-only queries against the live game state for the current tick.
pub trait World {
    fn spawns(&self) -> Vec<Spawn>;

    fn containers(&self) -> Vec<Container>;

    /// Every live unit, friendly and hostile, including ones still spawning.
    fn units(&self) -> Vec<Unit>;

    /// Resolve an id, `None` once the unit is dead.
    fn get_unit(&self, id: ObjectId) -> Option<Unit>;

    fn search_path(&self, from: Position, to: Position) -> Path;
}

/// Action requests. Nothing issued here is visible through `World` until the
/// next tick.
pub trait Intents {
    fn move_to(&mut self, unit: &Unit, pos: Position) -> ActionResult;

    fn attack(&mut self, unit: &Unit, target: &Target) -> ActionResult;

    fn ranged_attack(&mut self, unit: &Unit, target: &Target) -> ActionResult;

    fn withdraw(&mut self, unit: &Unit, container: &Container) -> ActionResult;

    fn transfer(&mut self, unit: &Unit, target: &Target) -> ActionResult;

    fn spawn_unit(&mut self, spawn: &Spawn, body: &[Part]) -> ActionResult;
}
