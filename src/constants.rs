use crate::prototypes::Part;

/// Fighters per squad.
pub const SQUAD_SIZE: usize = 6;

/// A target closer to the home spawn than this many path steps is treated as
/// an attack on the base: squads engage without waiting for rendezvous.
pub const NEAR_HOME_PATH_LENGTH: u32 = 20;

/// Rally point is the home spawn shifted this many tiles along the y axis,
/// clear of the spawn exit and the mining route.
pub const RALLY_OFFSET: i32 = 5;

/// Compact body compositions: (part, count) pairs expanded by
/// `creep::spawning::make_body`.
pub const MINER_PARTS: &[(Part, usize)] = &[(Part::Move, 1), (Part::Work, 1), (Part::Carry, 1)];
pub const INFANTRY_PARTS: &[(Part, usize)] = &[(Part::Move, 4), (Part::Attack, 4)];
pub const TANK_PARTS: &[(Part, usize)] = &[(Part::Move, 4), (Part::RangedAttack, 4)];

pub const MINER_COUNT: usize = 3;
pub const TANK_COUNT: usize = 9;
pub const INFANTRY_COUNT: usize = 5;
