use crate::creep::*;
use crate::prototypes::*;
use crate::world::*;
use log::*;

/// Attack `target` with whatever weapon the unit carries, melee first.
///
/// When the attack is not accepted and `hold_position` is false the unit also
/// closes in on the target. Returns true only if an attack was accepted; a
/// move never counts.
pub fn engage<I: Intents + ?Sized>(intents: &mut I, unit: &Unit, target: &Target, hold_position: bool) -> bool {
    let result = if has_part(unit, Part::Attack) {
        intents.attack(unit, target)
    } else if has_part(unit, Part::RangedAttack) {
        intents.ranged_attack(unit, target)
    } else {
        trace!("Unit {} has no weapon to engage {}", unit.id, target.id);

        return false;
    };

    let engaged = result.is_ok();

    if !engaged && !hold_position {
        intents.move_to(unit, target.pos);
    }

    engaged
}
