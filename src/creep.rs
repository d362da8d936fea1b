use crate::prototypes::*;
use bitflags::bitflags;
use itertools::Itertools;

bitflags! {
    /// Part kinds present in a body, regardless of count.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const MOVE          = 1;
        const WORK          = 1 << 1;
        const CARRY         = 1 << 2;
        const ATTACK        = 1 << 3;
        const RANGED_ATTACK = 1 << 4;
        const HEAL          = 1 << 5;
        const TOUGH         = 1 << 6;

        const COMBAT = Self::ATTACK.bits() | Self::RANGED_ATTACK.bits();
    }
}

impl Capabilities {
    pub fn from_part(part: Part) -> Capabilities {
        match part {
            Part::Move => Capabilities::MOVE,
            Part::Work => Capabilities::WORK,
            Part::Carry => Capabilities::CARRY,
            Part::Attack => Capabilities::ATTACK,
            Part::RangedAttack => Capabilities::RANGED_ATTACK,
            Part::Heal => Capabilities::HEAL,
            Part::Tough => Capabilities::TOUGH,
        }
    }

    pub fn from_body(body: &[Part]) -> Capabilities {
        body.iter()
            .fold(Capabilities::empty(), |caps, part| caps | Capabilities::from_part(*part))
    }

    pub fn is_combat(self) -> bool {
        self.intersects(Capabilities::COMBAT)
    }
}

/// True if the unit carries at least one part of the given kind.
pub fn has_part(unit: &Unit, part: Part) -> bool {
    unit.body.iter().any(|p| *p == part)
}

/// True if the unit's body is exactly the signature, ignoring part order.
///
/// This is not a capability check: a miner with an extra MOVE does not match
/// the miner signature.
pub fn matches_body(unit: &Unit, signature: &[Part]) -> bool {
    unit.body.len() == signature.len() && unit.body.iter().sorted().eq(signature.iter().sorted())
}

pub fn count_matching<'a, I>(units: I, signature: &[Part]) -> usize
where
    I: IntoIterator<Item = &'a Unit>,
{
    units.into_iter().filter(|unit| matches_body(unit, signature)).count()
}

pub fn is_combat_body(body: &[Part]) -> bool {
    Capabilities::from_body(body).is_combat()
}

/// A live unit able to melee or ranged attack.
pub fn is_fighter(unit: &Unit) -> bool {
    unit.exists && is_combat_body(&unit.body)
}

/// Friendly units split by role for one tick.
pub struct UnitGroups<'a> {
    pub harvesters: Vec<&'a Unit>,
    pub fighters: Vec<&'a Unit>,
    pub others: Vec<&'a Unit>,
}

impl<'a> UnitGroups<'a> {
    /// Harvesters are matched by exact composition so that a fighter with a
    /// CARRY part is never pulled onto the mining route.
    pub fn classify<I>(units: I, harvester_body: &[Part]) -> UnitGroups<'a>
    where
        I: IntoIterator<Item = &'a Unit>,
    {
        let mut groups = UnitGroups {
            harvesters: Vec::new(),
            fighters: Vec::new(),
            others: Vec::new(),
        };

        for unit in units {
            if matches_body(unit, harvester_body) {
                groups.harvesters.push(unit);
            } else if is_fighter(unit) {
                groups.fighters.push(unit);
            } else {
                groups.others.push(unit);
            }
        }

        groups
    }
}

pub mod spawning {
    use super::*;

    /// Expand a compact `(part, count)` composition into a body, keeping the
    /// order of the entries.
    pub fn make_body(parts: &[(Part, usize)]) -> Vec<Part> {
        parts
            .iter()
            .flat_map(|(part, count)| std::iter::repeat(*part).take(*count))
            .collect()
    }
}
