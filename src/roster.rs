use crate::creep::*;
use crate::prototypes::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Every fighter the home spawn has produced, in production order. Dead
/// fighters stay in the ledger; resolving them yields `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterLedger {
    ids: Vec<ObjectId>,
}

impl RosterLedger {
    pub fn new() -> RosterLedger {
        RosterLedger::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Note the unit the spawn is producing if it is a fighter. A spawn takes
    /// several ticks per unit, so the same id is offered repeatedly and only
    /// the first sighting is kept. Returns true if the ledger grew.
    pub fn record(&mut self, spawn: &Spawn) -> bool {
        let unit = match &spawn.spawning {
            Some(spawning) => &spawning.unit,
            None => return false,
        };

        if !is_combat_body(&unit.body) {
            return false;
        }

        if self.ids.last() == Some(&unit.id) {
            return false;
        }

        debug!("[Roster] Recording fighter {}", unit.id);

        self.ids.push(unit.id);

        true
    }

    /// Look up every recorded id, in ledger order.
    pub fn resolve<W: World + ?Sized>(&self, world: &W) -> Vec<Option<Unit>> {
        self.ids.iter().map(|id| world.get_unit(*id)).collect()
    }

    pub fn record_and_resolve<W: World + ?Sized>(&mut self, world: &W, spawn: &Spawn) -> Vec<Option<Unit>> {
        self.record(spawn);

        self.resolve(world)
    }

    /// Recorded fighters that still exist, in production order.
    pub fn live_fighters<W: World + ?Sized>(&self, world: &W) -> Vec<Unit> {
        self.resolve(world).into_iter().flatten().filter(is_fighter).collect()
    }
}

/// Fighters in a stable order: live fighters the ledger never saw (units
/// present from the start of the match) first, in snapshot order, then live
/// ledger entries in production order. The unit on the spawn is always the
/// newest ledger entry, so it always ends up last.
pub fn ordered_roster(resolved: Vec<Option<Unit>>, fighters: &[&Unit]) -> Vec<Unit> {
    let produced: Vec<Unit> = resolved
        .into_iter()
        .flatten()
        .filter(|unit| unit.my && is_fighter(unit))
        .collect();

    let recorded: HashSet<ObjectId> = produced.iter().map(|unit| unit.id).collect();
    let mut seen = HashSet::new();

    fighters
        .iter()
        .filter(|fighter| !recorded.contains(&fighter.id))
        .map(|fighter| (*fighter).clone())
        .chain(produced)
        .filter(|unit| seen.insert(unit.id))
        .collect()
}
