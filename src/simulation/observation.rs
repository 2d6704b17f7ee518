//! What a single soldier can see, for action policies

use crate::core::types::{CellPos, SimTime, SoldierId, TeamId};
use crate::items::catalog::{ItemKind, ItemProperties};
use crate::maze::grid::Grid;

/// Fields per visible item in the flattened vector
pub const ITEM_FEATURES: usize = 7;
/// Leading soldier fields in the flattened vector
pub const SELF_FEATURES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleItem {
    pub position: CellPos,
    pub properties: ItemProperties,
}

impl VisibleItem {
    pub fn kind(&self) -> ItemKind {
        self.properties.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleSoldier {
    pub id: SoldierId,
    pub team: TeamId,
    pub position: CellPos,
    pub health: i32,
}

/// Per-soldier view of the world, valid until the next mutation
#[derive(Debug, Clone)]
pub struct Observation<'a> {
    pub grid: &'a Grid,
    pub time: SimTime,
    pub soldier: SoldierId,
    pub team: TeamId,
    pub alive: bool,
    pub position: CellPos,
    pub health: i32,
    pub attack: i32,
    pub attack_range: u32,
    pub vision_range: u32,
    pub weapon: Option<ItemKind>,
    pub carrying_flag: bool,
    pub home: CellPos,
    pub base_active: bool,
    /// Item under the soldier's feet
    pub standing_on: Option<ItemKind>,
    /// An attack would hit something right now
    pub can_attack: bool,
    /// Items within vision, in row-major order
    pub items: Vec<VisibleItem>,
    pub allies: Vec<VisibleSoldier>,
    pub enemies: Vec<VisibleSoldier>,
    pub enemy_bases: Vec<(TeamId, CellPos)>,
}

impl Observation<'_> {
    /// `[health, x, y]` then `[x, y, health_delta, attack, attack_range,
    /// vision_boost, is_win_condition]` per visible item
    pub fn to_vector(&self) -> Vec<f32> {
        let mut vector = Vec::with_capacity(SELF_FEATURES + ITEM_FEATURES * self.items.len());
        vector.extend([self.health as f32, self.position.x as f32, self.position.y as f32]);
        for item in &self.items {
            vector.push(item.position.x as f32);
            vector.push(item.position.y as f32);
            vector.extend(item.properties.features());
        }
        vector
    }

    pub fn item_positions(&self) -> Vec<CellPos> {
        self.items.iter().map(|item| item.position).collect()
    }
}
