//! Team scores and the round clock

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::config::{PointTable, ScoringConfig};
use crate::core::types::{SimTime, TeamId};

/// Scoring events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreEvent {
    FlagCollect,
    FlagReturn,
    FriendlyFire,
    Suicide,
    Kill,
    BonusPickup,
    BaseDestroyed,
}

impl ScoreEvent {
    pub fn points(&self, table: &PointTable) -> i32 {
        match self {
            ScoreEvent::FlagCollect => table.flag_collect,
            ScoreEvent::FlagReturn => table.flag_return,
            ScoreEvent::FriendlyFire => table.friendly_fire,
            ScoreEvent::Suicide => table.suicide,
            ScoreEvent::Kill => table.kill,
            ScoreEvent::BonusPickup => table.bonus_pickup,
            ScoreEvent::BaseDestroyed => table.base_destroyed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    scores: BTreeMap<TeamId, i32>,
    points: PointTable,
    round_duration: SimTime,
    floor_at_zero: bool,
    elapsed: SimTime,
}

impl ScoreBoard {
    pub fn new<I: IntoIterator<Item = TeamId>>(teams: I, config: &ScoringConfig) -> Self {
        Self {
            scores: teams.into_iter().map(|t| (t, 0)).collect(),
            points: config.points.clone(),
            round_duration: config.round_duration,
            floor_at_zero: config.floor_at_zero,
            elapsed: 0.0,
        }
    }

    /// Add the event's points to `team`; returns the new score
    pub fn award(&mut self, team: TeamId, event: ScoreEvent) -> i32 {
        let delta = event.points(&self.points);
        let score = self.scores.entry(team).or_insert(0);
        *score += delta;
        if self.floor_at_zero {
            *score = (*score).max(0);
        }
        tracing::debug!(%team, ?event, delta, score = *score, "Score awarded");
        *score
    }

    pub fn score(&self, team: TeamId) -> i32 {
        self.scores.get(&team).copied().unwrap_or(0)
    }

    pub fn scores(&self) -> &BTreeMap<TeamId, i32> {
        &self.scores
    }

    /// Highest-scoring team; ties keep the lowest id
    pub fn leader(&self) -> Option<(TeamId, i32)> {
        self.scores
            .iter()
            .fold(None, |best: Option<(TeamId, i32)>, (team, score)| match best {
                Some((_, top)) if top >= *score => best,
                _ => Some((*team, *score)),
            })
    }

    pub fn advance(&mut self, dt: SimTime) {
        self.elapsed += dt;
    }

    pub fn elapsed(&self) -> SimTime {
        self.elapsed
    }

    pub fn time_remaining(&self) -> SimTime {
        (self.round_duration - self.elapsed).max(0.0)
    }

    pub fn is_round_over(&self) -> bool {
        self.elapsed >= self.round_duration
    }

    /// Zero every score and restart the clock
    pub fn reset_round(&mut self) {
        for score in self.scores.values_mut() {
            *score = 0;
        }
        self.elapsed = 0.0;
        tracing::info!(teams = self.scores.len(), "Round reset");
    }
}

/// Round wins over a best-of series
///
/// A round is won by the single highest score; a shared top score is a draw.
/// The series is decided once a team holds a majority of `best_of` or every
/// round has been played.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSeries {
    best_of: u32,
    wins: BTreeMap<TeamId, u32>,
    rounds_played: u32,
    draws: u32,
}

impl RoundSeries {
    pub fn new<I: IntoIterator<Item = TeamId>>(teams: I, best_of: u32) -> Self {
        Self {
            best_of: best_of.max(1),
            wins: teams.into_iter().map(|t| (t, 0)).collect(),
            rounds_played: 0,
            draws: 0,
        }
    }

    pub fn best_of(&self) -> u32 {
        self.best_of
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }

    pub fn wins(&self, team: TeamId) -> u32 {
        self.wins.get(&team).copied().unwrap_or(0)
    }

    pub fn wins_needed(&self) -> u32 {
        self.best_of / 2 + 1
    }

    /// Close a round on its final scores; returns the round winner
    pub fn record_round(&mut self, scores: &BTreeMap<TeamId, i32>) -> Option<TeamId> {
        self.rounds_played += 1;
        let Some(top) = scores.values().max().copied() else {
            self.draws += 1;
            return None;
        };
        let mut leaders = scores.iter().filter(|(_, s)| **s == top).map(|(t, _)| *t);
        match (leaders.next(), leaders.next()) {
            (Some(team), None) => {
                *self.wins.entry(team).or_insert(0) += 1;
                Some(team)
            }
            _ => {
                self.draws += 1;
                None
            }
        }
    }

    pub fn is_decided(&self) -> bool {
        self.rounds_played >= self.best_of || self.wins.values().any(|w| *w >= self.wins_needed())
    }

    /// Team with the most round wins, if it holds them alone
    pub fn leader(&self) -> Option<TeamId> {
        let top = self.wins.values().max().copied().filter(|w| *w > 0)?;
        let mut leaders = self.wins.iter().filter(|(_, w)| **w == top).map(|(t, _)| *t);
        match (leaders.next(), leaders.next()) {
            (Some(team), None) => Some(team),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(floor: bool) -> ScoreBoard {
        let config = ScoringConfig {
            floor_at_zero: floor,
            ..ScoringConfig::default()
        };
        ScoreBoard::new([TeamId(0), TeamId(1)], &config)
    }

    #[test]
    fn test_award_uses_point_table() {
        let mut scores = board(false);
        assert_eq!(scores.award(TeamId(0), ScoreEvent::BaseDestroyed), 100);
        assert_eq!(scores.award(TeamId(0), ScoreEvent::Suicide), 95);
        assert_eq!(scores.award(TeamId(1), ScoreEvent::FlagCollect), 25);
        assert_eq!(scores.award(TeamId(1), ScoreEvent::FlagReturn), 75);
        assert_eq!(scores.award(TeamId(1), ScoreEvent::FriendlyFire), 72);
        assert_eq!(scores.award(TeamId(1), ScoreEvent::Kill), 77);
        assert_eq!(scores.award(TeamId(1), ScoreEvent::BonusPickup), 80);
    }

    #[test]
    fn test_negative_scores_allowed_by_default() {
        let mut scores = board(false);
        assert_eq!(scores.award(TeamId(0), ScoreEvent::Suicide), -5);
    }

    #[test]
    fn test_floor_at_zero() {
        let mut scores = board(true);
        assert_eq!(scores.award(TeamId(0), ScoreEvent::Suicide), 0);
        assert_eq!(scores.award(TeamId(0), ScoreEvent::Kill), 5);
    }

    #[test]
    fn test_round_clock() {
        let mut scores = board(false);
        scores.advance(100.0);
        assert_eq!(scores.time_remaining(), 200.0);
        assert!(!scores.is_round_over());
        scores.advance(250.0);
        assert_eq!(scores.time_remaining(), 0.0);
        assert!(scores.is_round_over());
    }

    #[test]
    fn test_reset_round() {
        let mut scores = board(false);
        scores.award(TeamId(0), ScoreEvent::Kill);
        scores.advance(50.0);
        scores.reset_round();
        assert_eq!(scores.score(TeamId(0)), 0);
        assert_eq!(scores.time_remaining(), 300.0);
    }

    #[test]
    fn test_leader_prefers_lowest_id_on_tie() {
        let mut scores = board(false);
        assert_eq!(scores.leader(), Some((TeamId(0), 0)));
        scores.award(TeamId(1), ScoreEvent::Kill);
        assert_eq!(scores.leader(), Some((TeamId(1), 5)));
    }

    fn final_scores(a: i32, b: i32) -> BTreeMap<TeamId, i32> {
        BTreeMap::from([(TeamId(0), a), (TeamId(1), b)])
    }

    #[test]
    fn test_series_decided_by_majority() {
        let mut series = RoundSeries::new([TeamId(0), TeamId(1)], 3);
        assert_eq!(series.wins_needed(), 2);
        assert_eq!(series.record_round(&final_scores(30, 5)), Some(TeamId(0)));
        assert!(!series.is_decided());
        assert_eq!(series.record_round(&final_scores(50, 0)), Some(TeamId(0)));
        assert!(series.is_decided());
        assert_eq!(series.rounds_played(), 2);
        assert_eq!(series.leader(), Some(TeamId(0)));
    }

    #[test]
    fn test_drawn_rounds_count_toward_length() {
        let mut series = RoundSeries::new([TeamId(0), TeamId(1)], 3);
        assert_eq!(series.record_round(&final_scores(10, 10)), None);
        assert_eq!(series.record_round(&final_scores(0, 5)), Some(TeamId(1)));
        assert_eq!(series.record_round(&final_scores(-3, -3)), None);
        assert!(series.is_decided());
        assert_eq!(series.draws(), 2);
        assert_eq!(series.wins(TeamId(1)), 1);
        assert_eq!(series.leader(), Some(TeamId(1)));
    }

    #[test]
    fn test_series_without_round_wins_has_no_leader() {
        let mut series = RoundSeries::new([TeamId(0), TeamId(1)], 1);
        series.record_round(&final_scores(0, 0));
        assert!(series.is_decided());
        assert_eq!(series.leader(), None);
    }
}
