//! Item economy: initial placement, timed respawns and rarity weighting

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::EconomyConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{CellPos, SimTime};
use crate::items::catalog::{ItemCatalog, ItemKind};
use crate::maze::grid::Grid;
use crate::maze::occupancy::{open_cells, Occupancy};

/// Owns every item lying on the map
#[derive(Debug, Clone)]
pub struct ItemEconomy {
    catalog: ItemCatalog,
    items: BTreeMap<CellPos, ItemKind>,
    max_items: usize,
    respawn_delay: SimTime,
    initial_nuke_chance: f64,
    since_last_respawn: SimTime,
    rng: ChaCha8Rng,
}

impl ItemEconomy {
    /// `max_items = max(1, area / area_per_item)`
    pub fn new(grid: &Grid, config: &EconomyConfig, seed: u64) -> Self {
        let max_items = (grid.area() / config.area_per_item.max(1)).max(1);
        Self {
            catalog: ItemCatalog::standard(),
            items: BTreeMap::new(),
            max_items,
            respawn_delay: config.respawn_delay,
            initial_nuke_chance: config.initial_nuke_chance,
            since_last_respawn: 0.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn count_of(&self, kind: ItemKind) -> usize {
        self.items.values().filter(|k| **k == kind).count()
    }

    pub fn nuke_present(&self) -> bool {
        self.items.values().any(|k| *k == ItemKind::Nuke)
    }

    pub fn item_at(&self, pos: CellPos) -> Option<ItemKind> {
        self.items.get(&pos).copied()
    }

    pub fn flag_position(&self) -> Option<CellPos> {
        self.items
            .iter()
            .find(|(_, kind)| **kind == ItemKind::Flag)
            .map(|(pos, _)| *pos)
    }

    /// Items in row-major position order
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, ItemKind)> + '_ {
        self.items.iter().map(|(pos, kind)| (*pos, *kind))
    }

    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.items.keys().copied()
    }

    /// Remove and return the item at `pos`
    pub fn take(&mut self, pos: CellPos) -> Option<ItemKind> {
        self.items.remove(&pos)
    }

    /// Put an item on a specific cell; fails if the cell already holds one
    pub fn place_at(&mut self, pos: CellPos, kind: ItemKind) -> bool {
        if self.items.contains_key(&pos) {
            return false;
        }
        self.items.insert(pos, kind);
        true
    }

    /// Initial layout: one flag, maybe one nuke, then half the cap in common items
    ///
    /// Only a missing flag is fatal; the rest is best effort.
    pub fn place_initial(&mut self, grid: &Grid, blocked: &Occupancy) -> Result<Vec<(CellPos, ItemKind)>> {
        let mut placed = Vec::new();

        let Some(flag_pos) = self.place_one(ItemKind::Flag, grid, blocked) else {
            return Err(GameError::InsufficientFreeCells {
                what: "flag",
                needed: 1,
                available: 0,
            });
        };
        placed.push((flag_pos, ItemKind::Flag));

        if self.count() < self.max_items && self.rng.gen_bool(self.initial_nuke_chance) {
            if let Some(pos) = self.place_one(ItemKind::Nuke, grid, blocked) {
                placed.push((pos, ItemKind::Nuke));
            }
        }

        let fill = (self.max_items / 2).min(self.max_items - self.count());
        for _ in 0..fill {
            let Some(kind) = self.roll_kind(&[ItemKind::Flag, ItemKind::Nuke]) else {
                break;
            };
            match self.place_one(kind, grid, blocked) {
                Some(pos) => placed.push((pos, kind)),
                None => {
                    tracing::warn!(
                        placed = placed.len(),
                        "Map is full, initial item placement stopped early"
                    );
                    break;
                }
            }
        }

        tracing::info!(
            items = self.count(),
            max_items = self.max_items,
            nuke = self.nuke_present(),
            "Placed initial items"
        );
        Ok(placed)
    }

    /// Advance the respawn clock and spawn at most one item
    ///
    /// `reserved` slots of the cap are held back (for a flag that is being
    /// carried and will come back to the map).
    pub fn tick(
        &mut self,
        dt: SimTime,
        grid: &Grid,
        blocked: &Occupancy,
        reserved: usize,
    ) -> Option<(CellPos, ItemKind)> {
        self.since_last_respawn += dt;
        if self.since_last_respawn <= self.respawn_delay {
            return None;
        }
        if self.count() + reserved >= self.max_items {
            return None;
        }

        let mut excluded = vec![ItemKind::Flag];
        if self.nuke_present() {
            excluded.push(ItemKind::Nuke);
        }
        let kind = self.roll_kind(&excluded)?;

        match self.place_one(kind, grid, blocked) {
            Some(pos) => {
                self.since_last_respawn = 0.0;
                tracing::debug!(item = kind.name(), %pos, "Respawned item");
                Some((pos, kind))
            }
            None => {
                tracing::warn!(item = kind.name(), "No free cell for item respawn, retrying next tick");
                None
            }
        }
    }

    /// Place `kind` on a random open cell
    pub fn place_one(&mut self, kind: ItemKind, grid: &Grid, blocked: &Occupancy) -> Option<CellPos> {
        if kind == ItemKind::Nuke && self.nuke_present() {
            return None;
        }
        let mut occupancy = blocked.clone();
        occupancy.extend(self.items.keys().copied());
        let open = open_cells(grid, &occupancy);
        let pos = *open.choose(&mut self.rng)?;
        self.items.insert(pos, kind);
        Some(pos)
    }

    fn roll_kind(&mut self, excluded: &[ItemKind]) -> Option<ItemKind> {
        let pool = self.catalog.spawn_pool(excluded);
        pool.choose_weighted(&mut self.rng, |(_, weight)| *weight)
            .ok()
            .map(|(kind, _)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chance: f64) -> EconomyConfig {
        EconomyConfig {
            area_per_item: 25,
            respawn_delay: 30.0,
            initial_nuke_chance: chance,
        }
    }

    #[test]
    fn test_max_items_from_area() {
        let grid = Grid::open(11, 11);
        let economy = ItemEconomy::new(&grid, &config(0.1), 1);
        assert_eq!(economy.max_items(), 4);

        let tiny = Grid::open(3, 3);
        assert_eq!(ItemEconomy::new(&tiny, &config(0.1), 1).max_items(), 1);
    }

    #[test]
    fn test_initial_layout_counts() {
        let grid = Grid::open(21, 21);
        for seed in 0..20 {
            let mut economy = ItemEconomy::new(&grid, &config(0.5), seed);
            economy.place_initial(&grid, &Occupancy::new()).unwrap();
            let max = economy.max_items();
            let nukes = economy.count_of(ItemKind::Nuke);
            assert_eq!(economy.count_of(ItemKind::Flag), 1);
            assert!(nukes <= 1);
            assert_eq!(economy.count() - 1 - nukes, max / 2);
            assert!(economy.count() <= max);
        }
    }

    #[test]
    fn test_initial_nuke_always_with_certain_chance() {
        let grid = Grid::open(21, 21);
        let mut economy = ItemEconomy::new(&grid, &config(1.0), 3);
        economy.place_initial(&grid, &Occupancy::new()).unwrap();
        assert_eq!(economy.count_of(ItemKind::Nuke), 1);

        let mut economy = ItemEconomy::new(&grid, &config(0.0), 3);
        economy.place_initial(&grid, &Occupancy::new()).unwrap();
        assert_eq!(economy.count_of(ItemKind::Nuke), 0);
    }

    #[test]
    fn test_initial_placement_avoids_blocked_cells() {
        let grid = Grid::open(5, 5);
        let mut blocked = Occupancy::new();
        blocked.extend(grid.path_cells().filter(|p| p.y < 4).collect::<Vec<_>>());
        let mut economy = ItemEconomy::new(&grid, &config(0.0), 11);
        economy.place_initial(&grid, &blocked).unwrap();
        assert!(economy.positions().all(|p| p.y == 4));
    }

    #[test]
    fn test_flag_without_room_is_fatal() {
        let grid = Grid::open(3, 3);
        let mut blocked = Occupancy::new();
        blocked.extend(grid.path_cells().collect::<Vec<_>>());
        let mut economy = ItemEconomy::new(&grid, &config(0.0), 1);
        let result = economy.place_initial(&grid, &blocked);
        assert!(matches!(result, Err(GameError::InsufficientFreeCells { what: "flag", .. })));
    }

    #[test]
    fn test_respawn_waits_for_delay() {
        let grid = Grid::open(21, 21);
        let mut economy = ItemEconomy::new(&grid, &config(0.0), 5);
        economy.place_initial(&grid, &Occupancy::new()).unwrap();
        let before = economy.count();

        for _ in 0..30 {
            assert!(economy.tick(1.0, &grid, &Occupancy::new(), 0).is_none());
        }
        assert_eq!(economy.count(), before);

        let spawned = economy.tick(1.0, &grid, &Occupancy::new(), 0);
        assert!(spawned.is_some());
        assert_eq!(economy.count(), before + 1);

        // Clock restarts after a successful spawn
        assert!(economy.tick(1.0, &grid, &Occupancy::new(), 0).is_none());
    }

    #[test]
    fn test_respawn_respects_cap_and_nuke_limit() {
        let grid = Grid::open(21, 21);
        let mut economy = ItemEconomy::new(&grid, &config(1.0), 8);
        economy.place_initial(&grid, &Occupancy::new()).unwrap();

        for _ in 0..2000 {
            economy.tick(5.0, &grid, &Occupancy::new(), 0);
            assert!(economy.count() <= economy.max_items());
            assert!(economy.count_of(ItemKind::Nuke) <= 1);
            assert_eq!(economy.count_of(ItemKind::Flag), 1);
        }
        assert_eq!(economy.count(), economy.max_items());
    }

    #[test]
    fn test_reserved_slot_is_kept_free() {
        let grid = Grid::open(21, 21);
        let mut economy = ItemEconomy::new(&grid, &config(0.0), 2);
        economy.place_initial(&grid, &Occupancy::new()).unwrap();
        let flag = economy.flag_position().unwrap();
        economy.take(flag);

        for _ in 0..500 {
            economy.tick(5.0, &grid, &Occupancy::new(), 1);
        }
        assert_eq!(economy.count(), economy.max_items() - 1);
        assert!(economy.flag_position().is_none());
    }

    #[test]
    fn test_no_free_cell_skips_spawn() {
        let grid = Grid::open(10, 10);
        let mut economy = ItemEconomy::new(&grid, &config(0.0), 4);
        let mut blocked = Occupancy::new();
        blocked.extend(grid.path_cells().collect::<Vec<_>>());
        assert!(economy.tick(31.0, &grid, &blocked, 0).is_none());
        assert_eq!(economy.count(), 0);
        // Retried on the next tick once space frees up
        assert!(economy.tick(0.5, &grid, &Occupancy::new(), 0).is_some());
    }

    #[test]
    fn test_second_nuke_refused() {
        let grid = Grid::open(5, 5);
        let mut economy = ItemEconomy::new(&grid, &config(0.0), 4);
        assert!(economy.place_one(ItemKind::Nuke, &grid, &Occupancy::new()).is_some());
        assert!(economy.place_one(ItemKind::Nuke, &grid, &Occupancy::new()).is_none());
    }
}
