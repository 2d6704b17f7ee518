//! Teams and the soldier-to-team roster

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::MAX_TEAMS;
use crate::core::error::{GameError, Result};
use crate::core::types::{Rgb, SoldierId, TeamId};

/// Team names and colors, drawn without replacement
pub const PALETTE: [(&str, Rgb); MAX_TEAMS] = [
    ("Red", Rgb(255, 0, 0)),
    ("Blue", Rgb(0, 0, 255)),
    ("Pink", Rgb(255, 105, 180)),
    ("Green", Rgb(0, 128, 0)),
    ("Gold", Rgb(255, 215, 0)),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub color: Rgb,
}

/// Pick `count` distinct palette entries; ids follow draw order
pub fn draw_teams<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<Team>> {
    if count == 0 || count > PALETTE.len() {
        return Err(GameError::InvalidConfig(format!(
            "team count must be between 1 and {}, got {}",
            PALETTE.len(),
            count
        )));
    }
    Ok(PALETTE
        .choose_multiple(rng, count)
        .enumerate()
        .map(|(i, (name, color))| Team {
            id: TeamId(i as u32),
            name: (*name).to_string(),
            color: *color,
        })
        .collect())
}

/// Read-only team membership queries
pub trait RosterLookup {
    fn team_of(&self, soldier: SoldierId) -> Option<TeamId>;
    fn members(&self, team: TeamId) -> &[SoldierId];

    fn are_allies(&self, a: SoldierId, b: SoldierId) -> bool {
        match (self.team_of(a), self.team_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

/// Index from soldiers to teams and back
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_soldier: AHashMap<SoldierId, TeamId>,
    by_team: AHashMap<TeamId, Vec<SoldierId>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enlist(&mut self, soldier: SoldierId, team: TeamId) {
        if let Some(previous) = self.by_soldier.insert(soldier, team) {
            if let Some(members) = self.by_team.get_mut(&previous) {
                members.retain(|s| *s != soldier);
            }
        }
        self.by_team.entry(team).or_default().push(soldier);
    }

    pub fn len(&self) -> usize {
        self.by_soldier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_soldier.is_empty()
    }
}

impl RosterLookup for Roster {
    fn team_of(&self, soldier: SoldierId) -> Option<TeamId> {
        self.by_soldier.get(&soldier).copied()
    }

    fn members(&self, team: TeamId) -> &[SoldierId] {
        self.by_team.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }
}
