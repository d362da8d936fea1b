use super::engage::*;
use crate::findnearest::*;
use crate::prototypes::*;
use crate::world::*;
use log::*;
use serde::{Deserialize, Serialize};

/// Squad state for the current tick. Nothing carries over between ticks; the
/// state is re-derived from membership and threat distance every time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadState {
    /// Short of members, or the newest member is still spawning.
    #[default]
    Assembling,
    /// Advancing on the target and attacking.
    Engaging,
}

/// How fighters are organized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatStrategy {
    /// Fixed size squads that rendezvous before advancing.
    #[default]
    Squads,
    /// Every fighter attacks the nearest threat as soon as it exists.
    Swarm,
}

#[derive(Clone, Copy, Debug)]
pub struct SquadSettings {
    pub size: usize,
    pub near_home_path_length: u32,
    pub rally_offset: i32,
}

/// A tick-local group of fighters. The first member leads.
#[derive(Clone, Copy, Debug)]
pub struct Squad<'a> {
    pub members: &'a [Unit],
}

impl<'a> Squad<'a> {
    pub fn leader(&self) -> &'a Unit {
        &self.members[0]
    }

    pub fn followers(&self) -> &'a [Unit] {
        &self.members[1..]
    }

    pub fn last(&self) -> &'a Unit {
        &self.members[self.members.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self, size: usize) -> bool {
        self.members.len() >= size
    }

    /// Full, and the newest member is no longer on the spawn.
    pub fn rendezvous_complete(&self, size: usize, home: &Spawn) -> bool {
        self.is_full(size) && home.spawning_id() != Some(self.last().id)
    }
}

/// Split an ordered roster into contiguous squads of `size` (0 counts as 1).
/// Only the last squad may be short.
pub fn partition_squads(roster: &[Unit], size: usize) -> Vec<Squad<'_>> {
    roster.chunks(size.max(1)).map(|members| Squad { members }).collect()
}

/// Everything outside the squad that decisions depend on.
pub struct Battlefield<'a> {
    pub home: &'a Spawn,
    pub enemy_spawn: Option<&'a Spawn>,
    pub hostiles: &'a [Unit],
}

impl<'a> Battlefield<'a> {
    /// Nearest hostile to `from` by path. Falls back to the enemy spawn when
    /// there is no reachable hostile or when the nearest one is the unit the
    /// enemy spawn is still producing.
    pub fn select_target<W: World + ?Sized>(&self, world: &W, from: Position) -> Option<Target> {
        let nearest = self
            .hostiles
            .iter()
            .find_nearest_from(from, |start, end| world.search_path(start, end));

        let enemy_spawning = self.enemy_spawn.and_then(|spawn| spawn.spawning_id());

        match nearest {
            Some(hostile) if Some(hostile.id) != enemy_spawning => Some(Target::of(hostile)),
            _ => self.enemy_spawn.map(Target::of),
        }
    }

    /// Whether the target is within striking distance of the home spawn.
    pub fn is_near_home<W: World + ?Sized>(&self, world: &W, target: &Target, threshold: u32) -> bool {
        let path = world.search_path(self.home.pos, target.pos);

        !path.incomplete && (path.len() as u32) < threshold
    }

    pub fn rally_point(&self, offset: i32) -> Position {
        self.home.pos.offset(0, offset)
    }
}

/// Outcome of one squad's tick, for the tick summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadReport {
    pub leader: ObjectId,
    pub size: usize,
    pub state: SquadState,
    pub near_home: bool,
    pub target: Option<Target>,
    /// Members whose attack was accepted this tick.
    pub engaged: usize,
}

pub fn evaluate_squad_state(squad: &Squad, settings: &SquadSettings, home: &Spawn, near_home: bool) -> SquadState {
    if squad.rendezvous_complete(settings.size, home) || near_home {
        SquadState::Engaging
    } else {
        SquadState::Assembling
    }
}

pub fn run_squad<W, I>(world: &W, intents: &mut I, squad: &Squad, field: &Battlefield, settings: &SquadSettings) -> SquadReport
where
    W: World + ?Sized,
    I: Intents + ?Sized,
{
    let leader = squad.leader();
    let target = field.select_target(world, leader.pos);

    let near_home = target
        .as_ref()
        .map(|target| field.is_near_home(world, target, settings.near_home_path_length))
        .unwrap_or(false);

    let state = evaluate_squad_state(squad, settings, field.home, near_home);

    let mut report = SquadReport {
        leader: leader.id,
        size: squad.len(),
        state,
        near_home,
        target,
        engaged: 0,
    };

    let target = match target {
        Some(target) => target,
        None => {
            debug!("[Squad] No target for squad led by {}, holding", leader.id);
            return report;
        }
    };

    match state {
        SquadState::Engaging => {
            report.engaged = squad
                .members
                .iter()
                .filter(|member| engage(intents, member, &target, false))
                .count();
        }
        SquadState::Assembling => {
            intents.move_to(leader, field.rally_point(settings.rally_offset));

            for follower in squad.followers() {
                intents.move_to(follower, leader.pos);
            }
        }
    }

    report
}

/// Partition the roster and drive every squad.
pub fn run_squads<W, I>(world: &W, intents: &mut I, roster: &[Unit], field: &Battlefield, settings: &SquadSettings) -> Vec<SquadReport>
where
    W: World + ?Sized,
    I: Intents + ?Sized,
{
    partition_squads(roster, settings.size)
        .iter()
        .map(|squad| {
            let report = run_squad(world, intents, squad, field, settings);

            debug!(
                "[Squad] Leader {} size {} state {:?} target {:?} engaged {}",
                report.leader,
                report.size,
                report.state,
                report.target.map(|t| t.id),
                report.engaged
            );

            report
        })
        .collect()
}

/// Every fighter engages the target nearest to the first fighter. Returns
/// the number of accepted attacks.
pub fn run_swarm<W, I>(world: &W, intents: &mut I, roster: &[Unit], field: &Battlefield) -> usize
where
    W: World + ?Sized,
    I: Intents + ?Sized,
{
    let leader = match roster.first() {
        Some(leader) => leader,
        None => return 0,
    };

    match field.select_target(world, leader.pos) {
        Some(target) => roster.iter().filter(|unit| engage(intents, unit, &target, false)).count(),
        None => 0,
    }
}
