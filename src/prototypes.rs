use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of any game object (unit, spawn or container).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Position {
        Position { x, y }
    }

    /// Chebyshev distance, the range used by every action in the arena.
    pub fn get_range_to(&self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    pub fn in_range_to(&self, other: Position, range: u32) -> bool {
        self.get_range_to(other) <= range
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Body part kinds. Order matters only for `Ord`, which is what body
/// comparison sorts by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Part {
    Move,
    Work,
    Carry,
    Attack,
    RangedAttack,
    Heal,
    Tough,
}

pub trait HasPosition {
    fn pos(&self) -> Position;
}

pub trait HasId {
    fn id(&self) -> ObjectId;
}

/// Per-tick view of a unit. Owned by the host, never mutated here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: ObjectId,
    pub pos: Position,
    pub body: Vec<Part>,
    pub my: bool,
    /// Carried energy.
    pub energy: u32,
    pub exists: bool,
    pub spawning: bool,
}

impl Unit {
    pub fn new(id: ObjectId, pos: Position, body: Vec<Part>, my: bool) -> Unit {
        Unit {
            id,
            pos,
            body,
            my,
            energy: 0,
            exists: true,
            spawning: false,
        }
    }
}

impl HasPosition for Unit {
    fn pos(&self) -> Position {
        self.pos
    }
}

impl HasId for Unit {
    fn id(&self) -> ObjectId {
        self.id
    }
}

impl<T: HasPosition> HasPosition for &T {
    fn pos(&self) -> Position {
        (**self).pos()
    }
}

impl<T: HasId> HasId for &T {
    fn id(&self) -> ObjectId {
        (**self).id()
    }
}

/// The unit a spawn is currently producing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawning {
    pub unit: Unit,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub id: ObjectId,
    pub pos: Position,
    pub my: bool,
    pub spawning: Option<Spawning>,
}

impl Spawn {
    pub fn new(id: ObjectId, pos: Position, my: bool) -> Spawn {
        Spawn {
            id,
            pos,
            my,
            spawning: None,
        }
    }

    /// Id of the unit currently being produced, if any.
    pub fn spawning_id(&self) -> Option<ObjectId> {
        self.spawning.as_ref().map(|s| s.unit.id)
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning.is_some()
    }
}

impl HasPosition for Spawn {
    fn pos(&self) -> Position {
        self.pos
    }
}

impl HasId for Spawn {
    fn id(&self) -> ObjectId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: ObjectId,
    pub pos: Position,
    pub energy: u32,
}

impl HasPosition for Container {
    fn pos(&self) -> Position {
        self.pos
    }
}

impl HasId for Container {
    fn id(&self) -> ObjectId {
        self.id
    }
}

/// Anything an action can be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: ObjectId,
    pub pos: Position,
}

impl Target {
    pub fn of<T: HasId + HasPosition>(object: &T) -> Target {
        Target {
            id: object.id(),
            pos: object.pos(),
        }
    }
}

impl HasPosition for Target {
    fn pos(&self) -> Position {
        self.pos
    }
}

impl HasId for Target {
    fn id(&self) -> ObjectId {
        self.id
    }
}
