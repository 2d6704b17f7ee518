//! Authoritative world state
//!
//! Owns the maze, teams, bases, soldiers and items. `tick` advances timers;
//! actions arrive through `submit_action` between ticks. Nothing here calls
//! into policy code.

use std::collections::BTreeMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::GameConfig;
use crate::core::error::{ActionError, GameError, Result};
use crate::core::types::{CellPos, DamageKind, Direction, Rgb, SimTime, SoldierId, TeamId};
use crate::entity::base::Base;
use crate::entity::soldier::Soldier;
use crate::entity::team::{draw_teams, Roster, RosterLookup, Team};
use crate::items::catalog::{ItemKind, ItemProperties};
use crate::items::economy::ItemEconomy;
use crate::maze::generator::MazeGenerator;
use crate::maze::grid::Grid;
use crate::maze::occupancy::{open_cells, Occupancy};
use crate::simulation::action::{Action, ActionOutcome};
use crate::simulation::alert::BaseAlertSystem;
use crate::simulation::events::{TimedEvent, WorldEvent};
use crate::simulation::notify::{Notification, NotificationChannel, NotificationKind};
use crate::simulation::observation::{Observation, VisibleItem, VisibleSoldier};
use crate::simulation::score::{ScoreBoard, ScoreEvent};

/// Mixed into the maze seed so setup draws differ from maze carving
const SETUP_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Where the flag currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlagLocation {
    OnMap { position: CellPos },
    Carried { soldier: SoldierId, position: CellPos },
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSnapshot {
    pub id: TeamId,
    pub name: String,
    pub color: Rgb,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemSnapshot {
    pub position: CellPos,
    pub item: ItemKind,
}

/// Read-only copy of the world for renderers and logs
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub tick: u64,
    pub time_remaining: SimTime,
    pub grid: Grid,
    pub teams: Vec<TeamSnapshot>,
    pub bases: Vec<Base>,
    pub soldiers: Vec<Soldier>,
    pub items: Vec<ItemSnapshot>,
    pub flag: Option<FlagLocation>,
}

/// Attack target picked by the normal weapon rule
enum Target {
    Soldier(SoldierId),
    Base(TeamId),
}

pub struct WorldState {
    config: GameConfig,
    grid: Grid,
    teams: Vec<Team>,
    bases: BTreeMap<TeamId, Base>,
    soldiers: BTreeMap<SoldierId, Soldier>,
    roster: Roster,
    economy: ItemEconomy,
    alerts: BaseAlertSystem,
    scores: ScoreBoard,
    notifications: NotificationChannel,
    events: Vec<TimedEvent>,
    time: SimTime,
    tick: u64,
}

impl WorldState {
    /// Set up a match on `maze.map_path` if given, otherwise on a generated maze
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        if let Some(path) = config.maze.map_path.clone() {
            return Self::from_map_file(&path, config);
        }
        let maze = MazeGenerator::new(config.maze.seed).generate(config.maze.width, config.maze.height)?;
        Self::from_grid(maze.grid, config)
    }

    /// Set up a match on a saved map
    pub fn from_map_file(path: &Path, config: GameConfig) -> Result<Self> {
        let grid = Grid::load(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Map file rejected");
            GameError::MapLoad(e)
        })?;
        tracing::info!(path = %path.display(), width = grid.width(), height = grid.height(), "Loaded map");
        Self::from_grid(grid, config)
    }

    /// Set up a match on an existing grid
    pub fn from_grid(grid: Grid, config: GameConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.maze.seed ^ SETUP_SEED_SALT);

        let teams = draw_teams(config.teams.count, &mut rng)?;
        let base_cells = place_bases(&grid, teams.len(), config.teams.base_min_separation, &mut rng)?;

        let mut bases = BTreeMap::new();
        let mut soldiers = BTreeMap::new();
        let mut roster = Roster::new();
        let mut next_id = 0;
        for (team, cell) in teams.iter().zip(base_cells) {
            bases.insert(team.id, Base::new(team.id, cell, &config.base));
            for _ in 0..config.teams.soldiers_per_team {
                let id = SoldierId(next_id);
                next_id += 1;
                soldiers.insert(id, Soldier::new(id, team.id, cell, &config.soldier));
                roster.enlist(id, team.id);
            }
        }

        let economy = ItemEconomy::new(&grid, &config.economy, rng.gen());
        let scores = ScoreBoard::new(teams.iter().map(|t| t.id), &config.scoring);
        let alerts = BaseAlertSystem::new(config.base.alert_cooldown);

        let mut world = Self {
            config,
            grid,
            teams,
            bases,
            soldiers,
            roster,
            economy,
            alerts,
            scores,
            notifications: NotificationChannel::new(),
            events: Vec::new(),
            time: 0.0,
            tick: 0,
        };

        let blocked = world.blocked_cells();
        let placed = world.economy.place_initial(&world.grid, &blocked)?;
        for (position, item) in placed {
            world.log(WorldEvent::ItemSpawned { position, item });
        }

        tracing::info!(
            width = world.grid.width(),
            height = world.grid.height(),
            teams = world.teams.len(),
            soldiers = world.soldiers.len(),
            items = world.economy.count(),
            "World ready"
        );
        Ok(world)
    }

    /// Advance timers by `dt` seconds: clock, item respawn, soldier respawn, base alerts
    pub fn tick(&mut self, dt: SimTime) {
        self.time += dt;
        self.tick += 1;
        self.scores.advance(dt);

        let reserved = usize::from(self.carried_flag().is_some());
        let blocked = self.blocked_cells();
        if let Some((position, item)) = self.economy.tick(dt, &self.grid, &blocked, reserved) {
            self.log(WorldEvent::ItemSpawned { position, item });
        }

        let mut respawned = Vec::new();
        for soldier in self.soldiers.values_mut() {
            let Some(base) = self.bases.get(&soldier.team) else {
                continue;
            };
            if soldier.advance_respawn(dt, base.is_active(), base.position) {
                respawned.push((soldier.id, base.position));
            }
        }
        for (soldier, position) in respawned {
            self.log(WorldEvent::SoldierRespawned { soldier, position });
        }

        let positions = self.alive_positions();
        let mut alerted = Vec::new();
        for base in self.bases.values_mut() {
            if self
                .alerts
                .scan(base, &positions, &self.roster, &mut self.notifications, self.time)
            {
                alerted.push(base.team);
            }
        }
        for team in alerted {
            self.log(WorldEvent::BaseAlert { team });
        }
    }

    // Queries

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_index(&self, team: TeamId) -> Option<usize> {
        self.teams.iter().position(|t| t.id == team)
    }

    pub fn base(&self, team: TeamId) -> Option<&Base> {
        self.bases.get(&team)
    }

    pub fn bases(&self) -> impl Iterator<Item = &Base> {
        self.bases.values()
    }

    pub fn soldier(&self, id: SoldierId) -> Option<&Soldier> {
        self.soldiers.get(&id)
    }

    pub fn soldiers(&self) -> impl Iterator<Item = &Soldier> {
        self.soldiers.values()
    }

    pub fn soldier_ids(&self) -> Vec<SoldierId> {
        self.soldiers.keys().copied().collect()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn economy(&self) -> &ItemEconomy {
        &self.economy
    }

    pub fn items(&self) -> impl Iterator<Item = (CellPos, ItemKind)> + '_ {
        self.economy.iter()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn player_health(&self, id: SoldierId) -> Option<i32> {
        self.soldiers.get(&id).map(|s| s.health)
    }

    pub fn player_position(&self, id: SoldierId) -> Option<CellPos> {
        self.soldiers.get(&id).map(|s| s.position)
    }

    pub fn item_properties(&self, kind: ItemKind) -> &ItemProperties {
        self.economy.catalog().get(kind)
    }

    pub fn observation_vector(&self, id: SoldierId) -> Option<Vec<f32>> {
        self.observe(id).map(|obs| obs.to_vector())
    }

    pub fn team_score(&self, team: TeamId) -> i32 {
        self.scores.score(team)
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn time_remaining(&self) -> SimTime {
        self.scores.time_remaining()
    }

    pub fn is_round_over(&self) -> bool {
        self.scores.is_round_over()
    }

    pub fn reset_round(&mut self) {
        self.scores.reset_round();
        self.log(WorldEvent::RoundReset);
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationChannel {
        &mut self.notifications
    }

    /// Events logged since the previous drain, oldest first
    pub fn drain_events(&mut self) -> Vec<TimedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn flag_location(&self) -> Option<FlagLocation> {
        if let Some(position) = self.economy.flag_position() {
            return Some(FlagLocation::OnMap { position });
        }
        self.carried_flag()
            .map(|(soldier, position)| FlagLocation::Carried { soldier, position })
    }

    /// Cells held by bases, alive soldiers and items
    pub fn occupancy(&self) -> Occupancy {
        let mut occupancy = self.blocked_cells();
        occupancy.extend(self.economy.positions());
        occupancy
    }

    pub fn open_cells(&self) -> Vec<CellPos> {
        open_cells(&self.grid, &self.occupancy())
    }

    /// Everything `id` can currently perceive
    pub fn observe(&self, id: SoldierId) -> Option<Observation<'_>> {
        let soldier = self.soldiers.get(&id)?;
        let base = self.bases.get(&soldier.team)?;
        let catalog = self.economy.catalog();
        let sees = |pos: &CellPos| soldier.position.within(pos, soldier.vision_range);

        let items: Vec<VisibleItem> = self
            .economy
            .iter()
            .filter(|(pos, _)| sees(pos))
            .map(|(position, kind)| VisibleItem {
                position,
                properties: *catalog.get(kind),
            })
            .collect();

        let (allies, enemies): (Vec<_>, Vec<_>) = self
            .soldiers
            .values()
            .filter(|other| other.id != id && other.is_alive() && sees(&other.position))
            .map(|other| VisibleSoldier {
                id: other.id,
                team: other.team,
                position: other.position,
                health: other.health,
            })
            .partition(|other| other.team == soldier.team);

        let enemy_bases = self
            .bases
            .values()
            .filter(|b| b.team != soldier.team && b.is_active() && sees(&b.position))
            .map(|b| (b.team, b.position))
            .collect();

        Some(Observation {
            grid: &self.grid,
            time: self.time,
            soldier: id,
            team: soldier.team,
            alive: soldier.is_alive(),
            position: soldier.position,
            health: soldier.health,
            attack: soldier.attack,
            attack_range: soldier.attack_range,
            vision_range: soldier.vision_range,
            weapon: soldier.inventory.weapon,
            carrying_flag: soldier.is_carrying_flag(),
            home: base.position,
            base_active: base.is_active(),
            standing_on: self.economy.item_at(soldier.position),
            can_attack: soldier.is_alive() && self.has_target(soldier),
            items,
            allies,
            enemies,
            enemy_bases,
        })
    }

    /// Read-only copy of everything a renderer needs
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.time,
            tick: self.tick,
            time_remaining: self.time_remaining(),
            grid: self.grid.clone(),
            teams: self
                .teams
                .iter()
                .map(|t| TeamSnapshot {
                    id: t.id,
                    name: t.name.clone(),
                    color: t.color,
                    score: self.scores.score(t.id),
                })
                .collect(),
            bases: self.bases.values().cloned().collect(),
            soldiers: self.soldiers.values().cloned().collect(),
            items: self
                .economy
                .iter()
                .map(|(position, item)| ItemSnapshot { position, item })
                .collect(),
            flag: self.flag_location(),
        }
    }

    // Actions

    /// Apply one action for `id`
    pub fn submit_action(&mut self, id: SoldierId, action: Action) -> Result<ActionOutcome> {
        let soldier = self.soldiers.get(&id).ok_or(GameError::SoldierNotFound(id))?;
        if !soldier.is_alive() {
            return Err(ActionError::SoldierDead(id).into());
        }

        let outcome = match action {
            Action::Move(direction) => self.move_soldier(id, direction)?,
            Action::PickupIfPresent => self.pickup(id),
            Action::Attack => self.attack(id)?,
        };
        tracing::debug!(soldier = %id, ?action, ?outcome, "Action applied");
        Ok(outcome)
    }

    fn move_soldier(&mut self, id: SoldierId, direction: Direction) -> Result<ActionOutcome> {
        let Some(soldier) = self.soldiers.get_mut(&id) else {
            return Err(GameError::SoldierNotFound(id));
        };
        let target = soldier.position.step(direction);
        if !self.grid.is_path(target) {
            return Err(ActionError::Blocked { soldier: id, target }.into());
        }
        soldier.position = target;
        let team = soldier.team;
        let carrying = soldier.is_carrying_flag();

        let at_home = self
            .bases
            .get(&team)
            .is_some_and(|b| b.position == target);
        if !(carrying && at_home) {
            return Ok(ActionOutcome::Moved { to: target });
        }

        // The flag only leaves the carrier once it has somewhere to go
        let blocked = self.blocked_cells();
        let Some(flag_now_at) = self.economy.place_one(ItemKind::Flag, &self.grid, &blocked) else {
            tracing::warn!(soldier = %id, "No free cell to re-place the returned flag");
            return Ok(ActionOutcome::Moved { to: target });
        };
        if let Some(soldier) = self.soldiers.get_mut(&id) {
            soldier.lose_flag();
        }
        self.log(WorldEvent::FlagReturned { soldier: id, team });
        self.award(team, ScoreEvent::FlagReturn);
        tracing::info!(soldier = %id, %team, %flag_now_at, "Flag returned");
        Ok(ActionOutcome::FlagReturned { to: target, flag_now_at })
    }

    fn pickup(&mut self, id: SoldierId) -> ActionOutcome {
        let Some(soldier) = self.soldiers.get_mut(&id) else {
            return ActionOutcome::NothingToPickUp;
        };
        let position = soldier.position;
        let Some(item) = self.economy.take(position) else {
            return ActionOutcome::NothingToPickUp;
        };
        soldier.collect(self.economy.catalog().get(item));
        let team = soldier.team;

        self.log(WorldEvent::ItemCollected { soldier: id, position, item });
        match item {
            ItemKind::Flag => {
                tracing::info!(soldier = %id, %team, "Flag collected");
                self.award(team, ScoreEvent::FlagCollect);
            }
            ItemKind::PinkDuck => {
                self.award(team, ScoreEvent::BonusPickup);
            }
            _ => {}
        }
        ActionOutcome::Collected { item }
    }

    fn attack(&mut self, id: SoldierId) -> Result<ActionOutcome> {
        let Some(attacker) = self.soldiers.get(&id) else {
            return Err(GameError::SoldierNotFound(id));
        };
        if attacker.inventory.weapon == Some(ItemKind::Nuke) {
            return self.detonate(id);
        }

        let damage = attacker.attack;
        match self.pick_target(attacker) {
            Some(Target::Soldier(target)) => {
                let killed = self.damage_soldier(target, id, damage, DamageKind::Normal);
                Ok(ActionOutcome::HitSoldier { target, damage, killed })
            }
            Some(Target::Base(team)) => {
                let destroyed = self.damage_base(team, id, damage, DamageKind::Normal);
                Ok(ActionOutcome::HitBase { team, damage, destroyed })
            }
            None => Err(ActionError::NoTargetInRange(id).into()),
        }
    }

    /// Nuke: every alive soldier in range (the attacker too) and every active
    /// enemy base in range takes the blast; the weapon is spent
    fn detonate(&mut self, id: SoldierId) -> Result<ActionOutcome> {
        let Some(attacker) = self.soldiers.get(&id) else {
            return Err(GameError::SoldierNotFound(id));
        };
        let (center, range, damage, team) =
            (attacker.position, attacker.attack_range, attacker.attack, attacker.team);

        let victims: Vec<SoldierId> = self
            .soldiers
            .values()
            .filter(|s| s.is_alive() && center.within(&s.position, range))
            .map(|s| s.id)
            .collect();
        let bases: Vec<TeamId> = self
            .bases
            .values()
            .filter(|b| b.team != team && b.is_active() && center.within(&b.position, range))
            .map(|b| b.team)
            .collect();

        if bases.is_empty() && victims.iter().all(|v| *v == id) {
            return Err(ActionError::NoTargetInRange(id).into());
        }

        if let Some(attacker) = self.soldiers.get_mut(&id) {
            attacker.disarm();
        }
        self.log(WorldEvent::NukeDetonated { soldier: id, position: center });
        tracing::info!(soldier = %id, %center, victims = victims.len(), bases = bases.len(), "Nuke detonated");

        let mut soldiers_killed = 0;
        for victim in &victims {
            if self.damage_soldier(*victim, id, damage, DamageKind::Nuke) {
                soldiers_killed += 1;
            }
        }
        for base in &bases {
            self.damage_base(*base, id, damage, DamageKind::Nuke);
        }

        Ok(ActionOutcome::Detonated {
            soldiers_hit: victims.len(),
            soldiers_killed,
            bases_hit: bases.len(),
        })
    }

    // Internals

    fn log(&mut self, event: WorldEvent) {
        self.events.push(TimedEvent { time: self.time, event });
    }

    fn award(&mut self, team: TeamId, event: ScoreEvent) {
        let score = self.scores.award(team, event);
        self.log(WorldEvent::Scored { team, event, score });
    }

    /// Bases and alive soldiers; items are tracked by the economy itself
    fn blocked_cells(&self) -> Occupancy {
        let mut occupancy = Occupancy::new();
        occupancy.extend(self.bases.values().map(|b| b.position));
        occupancy.extend(self.soldiers.values().filter(|s| s.is_alive()).map(|s| s.position));
        occupancy
    }

    fn alive_positions(&self) -> Vec<(SoldierId, CellPos)> {
        self.soldiers
            .values()
            .filter(|s| s.is_alive())
            .map(|s| (s.id, s.position))
            .collect()
    }

    fn carried_flag(&self) -> Option<(SoldierId, CellPos)> {
        self.soldiers
            .values()
            .find(|s| s.is_carrying_flag())
            .map(|s| (s.id, s.position))
    }

    fn has_target(&self, soldier: &Soldier) -> bool {
        if soldier.inventory.weapon == Some(ItemKind::Nuke) {
            let (center, range) = (soldier.position, soldier.attack_range);
            return self.soldiers.values().any(|s| {
                s.id != soldier.id && s.team != soldier.team && s.is_alive() && center.within(&s.position, range)
            }) || self
                .bases
                .values()
                .any(|b| b.team != soldier.team && b.is_active() && center.within(&b.position, range));
        }
        self.pick_target(soldier).is_some()
    }

    /// Closest enemy soldier or active enemy base in range; soldiers win ties
    fn pick_target(&self, attacker: &Soldier) -> Option<Target> {
        let (center, range) = (attacker.position, attacker.attack_range);

        let soldier = self
            .soldiers
            .values()
            .filter(|s| s.team != attacker.team && s.is_alive() && center.within(&s.position, range))
            .min_by_key(|s| (center.distance_squared(&s.position), s.id))
            .map(|s| (center.distance_squared(&s.position), s.id));
        let base = self
            .bases
            .values()
            .filter(|b| b.team != attacker.team && b.is_active() && center.within(&b.position, range))
            .min_by_key(|b| (center.distance_squared(&b.position), b.team))
            .map(|b| (center.distance_squared(&b.position), b.team));

        match (soldier, base) {
            (Some((ds, s)), Some((db, _))) if ds <= db => Some(Target::Soldier(s)),
            (_, Some((_, b))) => Some(Target::Base(b)),
            (Some((_, s)), None) => Some(Target::Soldier(s)),
            (None, None) => None,
        }
    }

    /// Hit a soldier; returns true if the hit was fatal
    fn damage_soldier(&mut self, target: SoldierId, by: SoldierId, amount: i32, kind: DamageKind) -> bool {
        let threshold = self.config.soldier.low_health_threshold;
        let Some(victim) = self.soldiers.get_mut(&target) else {
            return false;
        };
        let before = victim.health;
        let killed = victim.take_damage(amount, kind);
        let (team, position, health) = (victim.team, victim.position, victim.health);

        self.log(WorldEvent::SoldierDamaged { soldier: target, by, amount });
        let members = self.roster.members(team);
        self.notifications.broadcast(
            members,
            &Notification {
                kind: NotificationKind::SoldierUnderAttack,
                position,
                from: Some(by),
                time: self.time,
                message: format!("{} hit for {} by {}", target, amount, by),
            },
        );
        if !killed && before > threshold && health <= threshold {
            self.notifications.broadcast(
                members,
                &Notification {
                    kind: NotificationKind::LowHealth,
                    position,
                    from: Some(target),
                    time: self.time,
                    message: format!("{} is down to {} health", target, health),
                },
            );
        }

        if killed {
            self.handle_death(target, by);
        }
        killed
    }

    fn handle_death(&mut self, victim: SoldierId, killer: SoldierId) {
        let Some(dead) = self.soldiers.get_mut(&victim) else {
            return;
        };
        let dropped = dead.lose_flag();
        let (victim_team, position) = (dead.team, dead.position);
        self.log(WorldEvent::SoldierKilled { soldier: victim, by: killer });

        if dropped {
            self.drop_flag(position);
        }

        let Some(killer_team) = self.roster.team_of(killer) else {
            return;
        };
        let event = if victim == killer {
            ScoreEvent::Suicide
        } else if victim_team == killer_team {
            ScoreEvent::FriendlyFire
        } else {
            ScoreEvent::Kill
        };
        self.award(killer_team, event);
    }

    /// Leave the flag where its carrier fell, unless that cell is a base
    fn drop_flag(&mut self, at: CellPos) {
        let on_base = self.bases.values().any(|b| b.position == at);
        let position = if !on_base && self.economy.place_at(at, ItemKind::Flag) {
            Some(at)
        } else {
            let blocked = self.blocked_cells();
            self.economy.place_one(ItemKind::Flag, &self.grid, &blocked)
        };
        match position {
            Some(position) => {
                tracing::debug!(%position, "Flag dropped");
                self.log(WorldEvent::FlagDropped { position });
            }
            None => tracing::warn!(%at, "No free cell for the dropped flag"),
        }
    }

    /// Hit a base; returns true if this hit destroyed it
    fn damage_base(&mut self, team: TeamId, by: SoldierId, amount: i32, kind: DamageKind) -> bool {
        let Some(base) = self.bases.get_mut(&team) else {
            return false;
        };
        let bonus = base.take_damage(amount, kind);
        let destroyed = !base.is_active() && bonus > 0;
        self.log(WorldEvent::BaseDamaged { team, by, amount });

        if destroyed {
            self.log(WorldEvent::BaseDestroyed { team, by });
            if let Some(attacker_team) = self.roster.team_of(by) {
                self.award(attacker_team, ScoreEvent::BaseDestroyed);
            }
        }
        destroyed
    }

    #[cfg(test)]
    fn soldier_mut(&mut self, id: SoldierId) -> Option<&mut Soldier> {
        self.soldiers.get_mut(&id)
    }

    #[cfg(test)]
    fn economy_mut(&mut self) -> &mut ItemEconomy {
        &mut self.economy
    }

    #[cfg(test)]
    fn base_mut(&mut self, team: TeamId) -> Option<&mut Base> {
        self.bases.get_mut(&team)
    }
}

/// Random base cells, pairwise at least `min_separation` apart by Manhattan distance
fn place_bases<R: Rng + ?Sized>(
    grid: &Grid,
    count: usize,
    min_separation: u32,
    rng: &mut R,
) -> Result<Vec<CellPos>> {
    let mut candidates = grid.path_cells().collect::<Vec<_>>();
    candidates.shuffle(rng);

    let mut chosen: Vec<CellPos> = Vec::with_capacity(count);
    for cell in candidates {
        if chosen.len() == count {
            break;
        }
        if chosen.iter().all(|c| c.manhattan(&cell) >= min_separation) {
            chosen.push(cell);
        }
    }

    if chosen.len() < count {
        return Err(GameError::InsufficientFreeCells {
            what: "base",
            needed: count,
            available: chosen.len(),
        });
    }
    Ok(chosen)
}
