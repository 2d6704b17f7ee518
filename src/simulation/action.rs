//! Actions soldiers can submit and what they produce

use serde::{Deserialize, Serialize};

use crate::core::types::{CellPos, Direction, SoldierId, TeamId};
use crate::items::catalog::ItemKind;

/// Number of discrete actions, in `Action::index` order
pub const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "direction", rename_all = "snake_case")]
pub enum Action {
    Move(Direction),
    Attack,
    PickupIfPresent,
}

impl Action {
    /// Moves in BFS direction order, then attack, then pickup
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Move(Direction::Down),
        Action::Move(Direction::Up),
        Action::Move(Direction::Right),
        Action::Move(Direction::Left),
        Action::Attack,
        Action::PickupIfPresent,
    ];

    pub fn index(&self) -> usize {
        match self {
            Action::Move(Direction::Down) => 0,
            Action::Move(Direction::Up) => 1,
            Action::Move(Direction::Right) => 2,
            Action::Move(Direction::Left) => 3,
            Action::Attack => 4,
            Action::PickupIfPresent => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a loose textual action name ("up", "move_left", "attack", "pickup")
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        let name = name.strip_prefix("move_").unwrap_or(&name);
        match name {
            "down" => Some(Action::Move(Direction::Down)),
            "up" => Some(Action::Move(Direction::Up)),
            "right" => Some(Action::Move(Direction::Right)),
            "left" => Some(Action::Move(Direction::Left)),
            "attack" => Some(Action::Attack),
            "pickup" | "pick_up" | "pickup_if_present" => Some(Action::PickupIfPresent),
            _ => None,
        }
    }
}

/// Result of an accepted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Moved { to: CellPos },
    /// Moved onto the home base carrying the flag
    FlagReturned { to: CellPos, flag_now_at: CellPos },
    Collected { item: ItemKind },
    NothingToPickUp,
    HitSoldier { target: SoldierId, damage: i32, killed: bool },
    HitBase { team: TeamId, damage: i32, destroyed: bool },
    Detonated { soldiers_hit: usize, soldiers_killed: usize, bases_hit: usize },
}
