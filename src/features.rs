//! Runtime switches and tunables. Hosts hand in a JSON document shaped like
//! the `Default` below; any missing key keeps its default.

use crate::constants::*;
use crate::military::squad::{CombatStrategy, SquadSettings};
use crate::spawnsystem::SpawnQueue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub combat: CombatFeatures,
    pub mining: MiningFeatures,
    pub spawning: SpawningFeatures,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatFeatures {
    pub strategy: CombatStrategy,
    pub squad_size: usize,
    pub near_home_path_length: u32,
    pub rally_offset: i32,
    /// Build squads from production order instead of snapshot order.
    pub ledger_ordered_roster: bool,
}

impl Default for CombatFeatures {
    fn default() -> CombatFeatures {
        CombatFeatures {
            strategy: CombatStrategy::Squads,
            squad_size: SQUAD_SIZE,
            near_home_path_length: NEAR_HOME_PATH_LENGTH,
            rally_offset: RALLY_OFFSET,
            ledger_ordered_roster: true,
        }
    }
}

impl CombatFeatures {
    pub fn squad_settings(&self) -> SquadSettings {
        SquadSettings {
            size: self.squad_size.max(1),
            near_home_path_length: self.near_home_path_length,
            rally_offset: self.rally_offset,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningFeatures {
    /// Allow bucket-brigade relay once enough harvesters exist.
    pub relay: bool,
}

impl Default for MiningFeatures {
    fn default() -> MiningFeatures {
        MiningFeatures { relay: true }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawningFeatures {
    pub enabled: bool,
    pub queue: SpawnQueue,
}

impl Default for SpawningFeatures {
    fn default() -> SpawningFeatures {
        SpawningFeatures {
            enabled: true,
            queue: SpawnQueue::default(),
        }
    }
}

impl Features {
    pub fn from_json(data: &str) -> Result<Features, String> {
        serde_json::from_str(data).map_err(|e| e.to_string())
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| e.to_string())
    }
}
