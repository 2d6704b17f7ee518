//! Item definitions and catalog
//!
//! Weapons replace a soldier's attack and range. Pills and binoculars add to
//! health and vision. The flag wins games, the fake flag and the pink duck
//! only mark the inventory.

use serde::{Deserialize, Serialize};

/// Every item type that can appear in the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    RedPill,
    BluePill,
    Knife,
    Gun,
    Grenade,
    Nuke,
    Binoculars,
    Flag,
    FakeFlag,
    PinkDuck,
}

/// How an item behaves when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Weapon,
    Healing,
    Vision,
    Marker,
}

impl ItemKind {
    pub const ALL: [ItemKind; 10] = [
        ItemKind::RedPill,
        ItemKind::BluePill,
        ItemKind::Knife,
        ItemKind::Gun,
        ItemKind::Grenade,
        ItemKind::Nuke,
        ItemKind::Binoculars,
        ItemKind::Flag,
        ItemKind::FakeFlag,
        ItemKind::PinkDuck,
    ];

    pub fn category(&self) -> ItemCategory {
        match self {
            ItemKind::Knife | ItemKind::Gun | ItemKind::Grenade | ItemKind::Nuke => ItemCategory::Weapon,
            ItemKind::RedPill | ItemKind::BluePill => ItemCategory::Healing,
            ItemKind::Binoculars => ItemCategory::Vision,
            ItemKind::Flag | ItemKind::FakeFlag | ItemKind::PinkDuck => ItemCategory::Marker,
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.category() == ItemCategory::Weapon
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::RedPill => "red pill",
            ItemKind::BluePill => "blue pill",
            ItemKind::Knife => "knife",
            ItemKind::Gun => "gun",
            ItemKind::Grenade => "grenade",
            ItemKind::Nuke => "nuke",
            ItemKind::Binoculars => "binoculars",
            ItemKind::Flag => "flag",
            ItemKind::FakeFlag => "fake flag",
            ItemKind::PinkDuck => "pink duck",
        }
    }
}

/// Effects of a single item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProperties {
    pub kind: ItemKind,
    /// Added to health on pickup
    pub health_delta: i32,
    /// Replaces attack on pickup (weapons only)
    pub attack: i32,
    /// Replaces attack range on pickup (weapons only)
    pub attack_range: u32,
    /// Added to vision range on pickup
    pub vision_boost: u32,
    /// Collecting this item is the capture objective
    pub win_condition: bool,
    /// Relative spawn frequency; zero never spawns randomly
    pub spawn_weight: u32,
}

impl ItemProperties {
    const fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            health_delta: 0,
            attack: 0,
            attack_range: 0,
            vision_boost: 0,
            win_condition: false,
            spawn_weight: 0,
        }
    }

    /// Numeric features in observation order
    pub fn features(&self) -> [f32; 5] {
        [
            self.health_delta as f32,
            self.attack as f32,
            self.attack_range as f32,
            self.vision_boost as f32,
            if self.win_condition { 1.0 } else { 0.0 },
        ]
    }
}

/// Static lookup table of item effects
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    entries: Vec<ItemProperties>,
}

impl ItemCatalog {
    /// The standard item table
    ///
    /// Nuke carries the smallest non-zero weight (1/20th of a red pill) so it
    /// stays the rarest spawn. The flag has weight zero: it is placed
    /// explicitly, never rolled.
    pub fn standard() -> Self {
        let entries = ItemKind::ALL
            .iter()
            .map(|&kind| {
                let base = ItemProperties::new(kind);
                match kind {
                    ItemKind::RedPill => ItemProperties { health_delta: 10, spawn_weight: 40, ..base },
                    ItemKind::BluePill => ItemProperties { health_delta: 20, spawn_weight: 20, ..base },
                    ItemKind::Knife => ItemProperties { attack: 3, attack_range: 1, spawn_weight: 25, ..base },
                    ItemKind::Gun => ItemProperties { attack: 5, attack_range: 4, spawn_weight: 15, ..base },
                    ItemKind::Grenade => ItemProperties { attack: 10, attack_range: 3, spawn_weight: 8, ..base },
                    ItemKind::Nuke => ItemProperties { attack: 100, attack_range: 3, spawn_weight: 2, ..base },
                    ItemKind::Binoculars => ItemProperties { vision_boost: 2, spawn_weight: 15, ..base },
                    ItemKind::Flag => ItemProperties { win_condition: true, ..base },
                    ItemKind::FakeFlag => ItemProperties { spawn_weight: 6, ..base },
                    ItemKind::PinkDuck => ItemProperties { spawn_weight: 6, ..base },
                }
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, kind: ItemKind) -> &ItemProperties {
        // Entries are built from ItemKind::ALL in declaration order
        &self.entries[kind as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemProperties> {
        self.entries.iter()
    }

    /// Kinds with a positive spawn weight, minus `excluded`
    pub fn spawn_pool(&self, excluded: &[ItemKind]) -> Vec<(ItemKind, u32)> {
        self.entries
            .iter()
            .filter(|p| p.spawn_weight > 0 && !excluded.contains(&p.kind))
            .map(|p| (p.kind, p.spawn_weight))
            .collect()
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
