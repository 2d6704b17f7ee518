//! Rule-based policy built on breadth-first search

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::types::{CellPos, Direction};
use crate::maze::grid::Grid;
use crate::maze::pathfinding::{nearest_of, random_adjacent_move, shortest_path};
use crate::policy::ActionPolicy;
use crate::simulation::action::Action;
use crate::simulation::observation::Observation;

/// Attack if possible, pick up what is underfoot, run the flag home,
/// otherwise chase the nearest visible item or wander
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    rng: ChaCha8Rng,
}

impl ScriptedPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn wander(&mut self, grid: &Grid, from: CellPos) -> Action {
        let next = random_adjacent_move(grid, from, &mut self.rng);
        match Direction::between(from, next) {
            Some(direction) => Action::Move(direction),
            // Boxed in: nothing useful to do
            None => Action::PickupIfPresent,
        }
    }
}

/// First step along a route, if the route goes anywhere
fn first_step(path: &[CellPos]) -> Option<Direction> {
    match path {
        [from, to, ..] => Direction::between(*from, *to),
        _ => None,
    }
}

impl ActionPolicy for ScriptedPolicy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn choose_action(&mut self, obs: &Observation<'_>) -> Action {
        if obs.can_attack {
            return Action::Attack;
        }
        if obs.standing_on.is_some() {
            return Action::PickupIfPresent;
        }

        if obs.carrying_flag && obs.base_active {
            if let Some(step) = shortest_path(obs.grid, obs.position, obs.home)
                .as_deref()
                .and_then(first_step)
            {
                return Action::Move(step);
            }
        }

        let targets = obs.item_positions();
        if let Some(step) = nearest_of(obs.grid, obs.position, &targets)
            .and_then(|(_, path)| first_step(&path))
        {
            return Action::Move(step);
        }

        self.wander(obs.grid, obs.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{SoldierId, TeamId};
    use crate::items::catalog::{ItemCatalog, ItemKind};
    use crate::simulation::observation::VisibleItem;

    fn observation(grid: &Grid, position: CellPos) -> Observation<'_> {
        Observation {
            grid,
            time: 0.0,
            soldier: SoldierId(0),
            team: TeamId(0),
            alive: true,
            position,
            health: 25,
            attack: 1,
            attack_range: 1,
            vision_range: 2,
            weapon: None,
            carrying_flag: false,
            home: CellPos::new(0, 0),
            base_active: true,
            standing_on: None,
            can_attack: false,
            items: vec![],
            allies: vec![],
            enemies: vec![],
            enemy_bases: vec![],
        }
    }

    fn item(kind: ItemKind, position: CellPos) -> VisibleItem {
        VisibleItem {
            position,
            properties: *ItemCatalog::standard().get(kind),
        }
    }

    #[test]
    fn test_attack_takes_priority() {
        let grid = Grid::open(5, 5);
        let mut obs = observation(&grid, CellPos::new(2, 2));
        obs.can_attack = true;
        obs.standing_on = Some(ItemKind::Gun);
        assert_eq!(ScriptedPolicy::new(1).choose_action(&obs), Action::Attack);
    }

    #[test]
    fn test_picks_up_item_underfoot() {
        let grid = Grid::open(5, 5);
        let mut obs = observation(&grid, CellPos::new(2, 2));
        obs.standing_on = Some(ItemKind::RedPill);
        assert_eq!(ScriptedPolicy::new(1).choose_action(&obs), Action::PickupIfPresent);
    }

    #[test]
    fn test_flag_carrier_heads_home() {
        let grid = Grid::parse("...\n##.\n...\n").unwrap();
        let mut obs = observation(&grid, CellPos::new(0, 2));
        obs.carrying_flag = true;
        obs.items = vec![item(ItemKind::Gun, CellPos::new(1, 2))];
        // Home is at (0, 0); the only way is right along the bottom row
        assert_eq!(
            ScriptedPolicy::new(1).choose_action(&obs),
            Action::Move(Direction::Right)
        );
    }

    #[test]
    fn test_routes_to_nearest_item() {
        let grid = Grid::open(5, 5);
        let mut obs = observation(&grid, CellPos::new(2, 2));
        obs.items = vec![
            item(ItemKind::Knife, CellPos::new(4, 4)),
            item(ItemKind::RedPill, CellPos::new(2, 0)),
        ];
        assert_eq!(ScriptedPolicy::new(1).choose_action(&obs), Action::Move(Direction::Up));
    }

    #[test]
    fn test_wanders_without_targets() {
        let grid = Grid::parse("#.#\n...\n###\n").unwrap();
        let obs = observation(&grid, CellPos::new(1, 1));
        let mut policy = ScriptedPolicy::new(5);
        for _ in 0..10 {
            match policy.choose_action(&obs) {
                Action::Move(d) => assert!(grid.is_path(obs.position.step(d))),
                other => panic!("expected a move, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_boxed_in_falls_back_to_pickup() {
        let grid = Grid::parse("###\n#.#\n###\n").unwrap();
        let obs = observation(&grid, CellPos::new(1, 1));
        assert_eq!(ScriptedPolicy::new(1).choose_action(&obs), Action::PickupIfPresent);
    }
}
