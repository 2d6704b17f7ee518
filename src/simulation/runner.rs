//! Headless match driver: ticks the world and feeds it policy decisions

use serde::Serialize;

use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{SimTime, SoldierId};
use crate::policy::{build_policy, ActionPolicy};
use crate::simulation::events::WorldEvent;
use crate::simulation::score::RoundSeries;
use crate::simulation::world::WorldState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub items_spawned: u32,
    pub items_collected: u32,
    pub kills: u32,
    pub respawns: u32,
    pub flag_returns: u32,
    pub bases_destroyed: u32,
    pub nukes: u32,
    pub alerts: u32,
    pub rejected_actions: u32,
}

impl MatchStats {
    fn record(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::ItemSpawned { .. } => self.items_spawned += 1,
            WorldEvent::ItemCollected { .. } => self.items_collected += 1,
            WorldEvent::SoldierKilled { .. } => self.kills += 1,
            WorldEvent::SoldierRespawned { .. } => self.respawns += 1,
            WorldEvent::FlagReturned { .. } => self.flag_returns += 1,
            WorldEvent::BaseDestroyed { .. } => self.bases_destroyed += 1,
            WorldEvent::NukeDetonated { .. } => self.nukes += 1,
            WorldEvent::BaseAlert { .. } => self.alerts += 1,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub name: String,
    pub policy: String,
    pub score: i32,
    pub base_health: i32,
    pub base_active: bool,
    pub soldiers_alive: usize,
    pub round_wins: u32,
}

/// End-of-run report
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub ticks: u64,
    pub sim_time: SimTime,
    pub round_over: bool,
    /// Leader of the current (or last) round
    pub winner: Option<String>,
    pub best_of: u32,
    pub rounds_played: u32,
    pub series_decided: bool,
    /// Team with the most round wins; None while nobody leads alone
    pub series_winner: Option<String>,
    pub teams: Vec<TeamSummary>,
    pub stats: MatchStats,
}

/// A world plus one policy per team, in team order, played as a best-of series
pub struct Match {
    world: WorldState,
    policies: Vec<Box<dyn ActionPolicy>>,
    stats: MatchStats,
    series: RoundSeries,
}

impl Match {
    /// Build the world and the configured policy for every team
    pub fn new(config: GameConfig) -> Result<Self> {
        let world = WorldState::new(config)?;
        let policies = (0..world.teams().len())
            .map(|i| build_policy(world.config().policy.for_team(i), world.config().maze.seed.wrapping_add(i as u64)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::with_policies(world, policies))
    }

    pub fn with_policies(world: WorldState, policies: Vec<Box<dyn ActionPolicy>>) -> Self {
        let series = RoundSeries::new(world.teams().iter().map(|t| t.id), world.config().scoring.best_of);
        Self {
            world,
            policies,
            stats: MatchStats::default(),
            series,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn series(&self) -> &RoundSeries {
        &self.series
    }

    /// One tick, then one decision per alive soldier in id order
    ///
    /// When the tick ends a round, the round goes to the series and, unless
    /// that decides it, scores and clock reset for the next round.
    pub fn step(&mut self, dt: SimTime) -> Result<()> {
        self.world.tick(dt);

        for id in self.world.soldier_ids() {
            self.act(id)?;
        }

        for event in self.world.drain_events() {
            self.stats.record(&event.event);
        }

        if self.world.is_round_over() && !self.series.is_decided() {
            self.finish_round();
        }
        Ok(())
    }

    fn finish_round(&mut self) {
        let winner = self.series.record_round(self.world.scores().scores());
        let winner_name = winner
            .and_then(|id| self.world.team_index(id))
            .map(|i| self.world.teams()[i].name.as_str())
            .unwrap_or("draw");
        tracing::info!(
            round = self.series.rounds_played(),
            best_of = self.series.best_of(),
            winner = winner_name,
            "Round finished"
        );
        if !self.series.is_decided() {
            self.world.reset_round();
        }
    }

    fn act(&mut self, id: SoldierId) -> Result<()> {
        let action = {
            let Some(observation) = self.world.observe(id) else {
                return Ok(());
            };
            if !observation.alive {
                return Ok(());
            }
            let Some(policy) = self
                .world
                .team_index(observation.team)
                .and_then(|i| self.policies.get_mut(i))
            else {
                return Err(GameError::PolicyError(format!("no policy for {}", observation.team)));
            };
            policy.choose_action(&observation)
        };

        match self.world.submit_action(id, action) {
            Ok(_) => Ok(()),
            Err(GameError::InvalidAction(reason)) => {
                tracing::debug!(soldier = %id, ?action, %reason, "Action rejected");
                self.stats.rejected_actions += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Step until `ticks` have run or the series is decided
    pub fn run(&mut self, ticks: u64, dt: SimTime) -> Result<MatchSummary> {
        for _ in 0..ticks {
            if self.series.is_decided() {
                tracing::info!(time = self.world.time(), rounds = self.series.rounds_played(), "Series decided");
                break;
            }
            self.step(dt)?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> MatchSummary {
        let world = &self.world;
        let teams = world
            .teams()
            .iter()
            .zip(&self.policies)
            .map(|(team, policy)| {
                let base = world.base(team.id);
                TeamSummary {
                    name: team.name.clone(),
                    policy: policy.name().to_string(),
                    score: world.team_score(team.id),
                    base_health: base.map_or(0, |b| b.health),
                    base_active: base.is_some_and(|b| b.is_active()),
                    soldiers_alive: world
                        .soldiers()
                        .filter(|s| s.team == team.id && s.is_alive())
                        .count(),
                    round_wins: self.series.wins(team.id),
                }
            })
            .collect();

        let winner = world
            .scores()
            .leader()
            .and_then(|(id, _)| world.team_index(id))
            .map(|i| world.teams()[i].name.clone());
        let series_winner = self
            .series
            .leader()
            .and_then(|id| world.team_index(id))
            .map(|i| world.teams()[i].name.clone());

        MatchSummary {
            seed: world.config().maze.seed,
            width: world.grid().width(),
            height: world.grid().height(),
            ticks: world.tick_count(),
            sim_time: world.time(),
            round_over: world.is_round_over(),
            winner,
            best_of: self.series.best_of(),
            rounds_played: self.series.rounds_played(),
            series_decided: self.series.is_decided(),
            series_winner,
            teams,
            stats: self.stats.clone(),
        }
    }
}
