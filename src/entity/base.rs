//! Team bases

use serde::{Deserialize, Serialize};

use crate::core::config::BaseConfig;
use crate::core::types::{CellPos, DamageKind, SimTime, TeamId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub team: TeamId,
    pub position: CellPos,
    pub health: i32,
    pub vision_range: u32,
    active: bool,
    max_health: i32,
    destroyed_bonus: i32,
    nuke_damage_cap: i32,
    /// Sim time of the last alert broadcast
    pub last_alert: Option<SimTime>,
}

impl Base {
    pub fn new(team: TeamId, position: CellPos, config: &BaseConfig) -> Self {
        Self {
            team,
            position,
            health: config.max_health,
            vision_range: config.vision_range,
            active: config.max_health > 0,
            max_health: config.max_health,
            destroyed_bonus: config.destroyed_bonus,
            nuke_damage_cap: config.nuke_damage_cap,
            last_alert: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Apply damage and return the destruction bonus earned by this hit
    ///
    /// Nuke damage is clamped to the configured cap. Hitting an inactive base
    /// does nothing and earns nothing.
    pub fn take_damage(&mut self, amount: i32, kind: DamageKind) -> i32 {
        if !self.active {
            return 0;
        }
        let amount = match kind {
            DamageKind::Normal => amount,
            DamageKind::Nuke => amount.min(self.nuke_damage_cap),
        }
        .max(0);

        self.health -= amount;
        if self.health > 0 {
            return 0;
        }

        self.active = false;
        tracing::info!(team = %self.team, position = %self.position, "Base destroyed");
        self.destroyed_bonus
    }
}
