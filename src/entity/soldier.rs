//! Soldier state machine: Alive <-> Dead(respawn timer)

use serde::{Deserialize, Serialize};

use crate::core::config::SoldierConfig;
use crate::core::types::{CellPos, DamageKind, SimTime, SoldierId, TeamId};
use crate::items::catalog::{ItemCategory, ItemKind, ItemProperties};

/// Slack for float drift when a respawn timer is stepped down to zero
const TIMER_EPSILON: SimTime = 1e-9;

/// Team default stats a soldier is reset to on respawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldierStats {
    pub health: i32,
    pub attack: i32,
    pub attack_range: u32,
    pub vision_range: u32,
}

impl From<&SoldierConfig> for SoldierStats {
    fn from(config: &SoldierConfig) -> Self {
        Self {
            health: config.health,
            attack: config.attack,
            attack_range: config.attack_range,
            vision_range: config.vision_range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LifeState {
    Alive,
    Dead { respawn_in: SimTime },
}

/// What a soldier is carrying
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Last weapon picked up
    pub weapon: Option<ItemKind>,
    pub has_flag: bool,
    pub has_fake_flag: bool,
    pub pink_ducks: u32,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Soldier {
    pub id: SoldierId,
    pub team: TeamId,
    pub position: CellPos,
    pub health: i32,
    pub attack: i32,
    pub attack_range: u32,
    pub vision_range: u32,
    pub inventory: Inventory,
    pub state: LifeState,
    defaults: SoldierStats,
    respawn_delay: SimTime,
    nuke_respawn_delay: SimTime,
}

impl Soldier {
    pub fn new(id: SoldierId, team: TeamId, home: CellPos, config: &SoldierConfig) -> Self {
        let defaults = SoldierStats::from(config);
        Self {
            id,
            team,
            position: home,
            health: defaults.health,
            attack: defaults.attack,
            attack_range: defaults.attack_range,
            vision_range: defaults.vision_range,
            inventory: Inventory::default(),
            state: LifeState::Alive,
            defaults,
            respawn_delay: config.respawn_delay,
            nuke_respawn_delay: config.nuke_respawn_delay,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.state, LifeState::Alive)
    }

    pub fn defaults(&self) -> &SoldierStats {
        &self.defaults
    }

    /// Seconds until respawn, None while alive
    pub fn respawn_in(&self) -> Option<SimTime> {
        match self.state {
            LifeState::Alive => None,
            LifeState::Dead { respawn_in } => Some(respawn_in.max(0.0)),
        }
    }

    pub fn is_carrying_flag(&self) -> bool {
        self.is_alive() && self.inventory.has_flag
    }

    /// Apply damage; returns true if this hit killed the soldier
    ///
    /// Dead soldiers ignore damage.
    pub fn take_damage(&mut self, amount: i32, kind: DamageKind) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health -= amount.max(0);
        if self.health <= 0 {
            self.kill(kind);
            return true;
        }
        false
    }

    /// Force the Dead state and start the respawn countdown
    pub fn kill(&mut self, kind: DamageKind) {
        if !self.is_alive() {
            return;
        }
        let respawn_in = match kind {
            DamageKind::Normal => self.respawn_delay,
            DamageKind::Nuke => self.nuke_respawn_delay,
        };
        self.health = self.health.min(0);
        self.state = LifeState::Dead { respawn_in };
        tracing::debug!(soldier = %self.id, team = %self.team, respawn_in, "Soldier died");
    }

    /// Step the respawn timer; returns true if the soldier came back this call
    ///
    /// A soldier whose base is inactive stays dead no matter how long it waits.
    pub fn advance_respawn(&mut self, dt: SimTime, base_active: bool, home: CellPos) -> bool {
        let LifeState::Dead { respawn_in } = &mut self.state else {
            return false;
        };
        *respawn_in -= dt;
        if *respawn_in > TIMER_EPSILON || !base_active {
            return false;
        }
        self.respawn(home);
        true
    }

    /// Back to full default stats at `home` with an empty inventory
    pub fn respawn(&mut self, home: CellPos) {
        self.position = home;
        self.health = self.defaults.health;
        self.attack = self.defaults.attack;
        self.attack_range = self.defaults.attack_range;
        self.vision_range = self.defaults.vision_range;
        self.inventory = Inventory::default();
        self.state = LifeState::Alive;
        tracing::info!(soldier = %self.id, team = %self.team, %home, "Soldier respawned");
    }

    /// Apply an item's pickup effect
    pub fn collect(&mut self, item: &ItemProperties) {
        match item.kind.category() {
            ItemCategory::Weapon => {
                self.attack = item.attack;
                self.attack_range = item.attack_range;
                self.inventory.weapon = Some(item.kind);
            }
            ItemCategory::Healing => self.health += item.health_delta,
            ItemCategory::Vision => self.vision_range += item.vision_boost,
            ItemCategory::Marker => match item.kind {
                ItemKind::Flag => self.inventory.has_flag = true,
                ItemKind::FakeFlag => self.inventory.has_fake_flag = true,
                ItemKind::PinkDuck => self.inventory.pink_ducks += 1,
                _ => {}
            },
        }
    }

    /// Drop the flag; returns whether it was held
    pub fn lose_flag(&mut self) -> bool {
        std::mem::take(&mut self.inventory.has_flag)
    }

    /// Remove a spent weapon and fall back to bare-hand stats
    pub fn disarm(&mut self) {
        self.inventory.weapon = None;
        self.attack = self.defaults.attack;
        self.attack_range = self.defaults.attack_range;
    }
}
