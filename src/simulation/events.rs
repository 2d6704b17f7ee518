//! World event log

use serde::{Deserialize, Serialize};

use crate::core::types::{CellPos, SimTime, SoldierId, TeamId};
use crate::items::catalog::ItemKind;
use crate::simulation::score::ScoreEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldEvent {
    ItemSpawned { position: CellPos, item: ItemKind },
    ItemCollected { soldier: SoldierId, position: CellPos, item: ItemKind },
    SoldierDamaged { soldier: SoldierId, by: SoldierId, amount: i32 },
    SoldierKilled { soldier: SoldierId, by: SoldierId },
    SoldierRespawned { soldier: SoldierId, position: CellPos },
    BaseDamaged { team: TeamId, by: SoldierId, amount: i32 },
    BaseDestroyed { team: TeamId, by: SoldierId },
    BaseAlert { team: TeamId },
    NukeDetonated { soldier: SoldierId, position: CellPos },
    FlagReturned { soldier: SoldierId, team: TeamId },
    FlagDropped { position: CellPos },
    Scored { team: TeamId, event: ScoreEvent, score: i32 },
    RoundReset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub time: SimTime,
    pub event: WorldEvent,
}
