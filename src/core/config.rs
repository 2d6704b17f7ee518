//! Game configuration with documented defaults
//!
//! Every tunable number of a match lives here. The whole tree can be loaded
//! from a TOML file; missing sections and fields fall back to the defaults
//! below, so a config file only needs to mention what it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::SimTime;

/// Largest number of teams the palette supports
pub const MAX_TEAMS: usize = 5;

/// Complete match configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub teams: TeamConfig,
    pub soldier: SoldierConfig,
    pub base: BaseConfig,
    pub economy: EconomyConfig,
    pub scoring: ScoringConfig,
    pub policy: PolicyConfig,
}

/// Maze generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Requested width in cells (coerced to the next odd value)
    pub width: usize,
    /// Requested height in cells (coerced to the next odd value)
    pub height: usize,
    /// Seed for every random stream of the match
    pub seed: u64,
    /// Saved map to play on instead of a generated maze
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_path: Option<PathBuf>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            seed: 12345,
            map_path: None,
        }
    }
}

/// Team setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    /// Number of competing teams (1..=5)
    pub count: usize,
    /// Soldiers spawned per team
    pub soldiers_per_team: usize,
    /// Minimum Manhattan distance between any two bases
    pub base_min_separation: u32,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            count: 2,
            soldiers_per_team: 2,
            base_min_separation: 4,
        }
    }
}

/// Soldier defaults, restored on every respawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoldierConfig {
    pub health: i32,
    /// Bare-handed attack power
    pub attack: i32,
    /// Bare-handed attack range in cells
    pub attack_range: u32,
    /// Vision radius in cells
    pub vision_range: u32,
    /// Seconds a soldier stays dead
    pub respawn_delay: SimTime,
    /// Seconds a soldier stays dead after a nuke
    pub nuke_respawn_delay: SimTime,
    /// Health at or below which teammates get a low-health notification
    pub low_health_threshold: i32,
}

impl Default for SoldierConfig {
    fn default() -> Self {
        Self {
            health: 25,
            attack: 1,
            attack_range: 1,
            vision_range: 2,
            respawn_delay: 5.0,
            nuke_respawn_delay: 15.0,
            low_health_threshold: 10,
        }
    }
}

/// Base parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    pub max_health: i32,
    /// Radius in cells within which enemies trigger an alert
    pub vision_range: u32,
    /// Minimum seconds between two alerts of the same base
    pub alert_cooldown: SimTime,
    /// Value reported to the caller when a base is destroyed
    pub destroyed_bonus: i32,
    /// Upper bound on a single nuke hit against a base
    pub nuke_damage_cap: i32,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            max_health: 150,
            vision_range: 4,
            alert_cooldown: 10.0,
            destroyed_bonus: 100,
            nuke_damage_cap: 100,
        }
    }
}

/// Item economy parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Map cells per allowed item: `max_items = area / area_per_item`
    pub area_per_item: usize,
    /// Seconds between two respawned items
    pub respawn_delay: SimTime,
    /// Probability of a nuke at match start
    pub initial_nuke_chance: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            area_per_item: 25,
            respawn_delay: 30.0,
            initial_nuke_chance: 0.1,
        }
    }
}

/// Round clock and point table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Round length in seconds
    pub round_duration: SimTime,
    /// Rounds in a series; the first team to win a majority takes it
    pub best_of: u32,
    /// Clamp running team scores at zero
    pub floor_at_zero: bool,
    pub points: PointTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            round_duration: 300.0,
            best_of: 3,
            floor_at_zero: false,
            points: PointTable::default(),
        }
    }
}

/// Signed points per score event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointTable {
    pub flag_collect: i32,
    pub flag_return: i32,
    pub friendly_fire: i32,
    pub suicide: i32,
    pub kill: i32,
    pub bonus_pickup: i32,
    pub base_destroyed: i32,
}

impl Default for PointTable {
    fn default() -> Self {
        Self {
            flag_collect: 25,
            flag_return: 50,
            friendly_fire: -3,
            suicide: -5,
            kill: 5,
            bonus_pickup: 3,
            base_destroyed: 100,
        }
    }
}

/// Which action policy drives a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyKind {
    /// Breadth-first item hunter
    Scripted,
    /// Linear scorer with weights read from a JSON file
    Linear { weights_path: String },
    /// Scoring model served over HTTP at `url`
    Remote {
        url: String,
        #[serde(default = "default_remote_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_remote_timeout_ms() -> u64 {
    500
}

impl Default for PolicyKind {
    fn default() -> Self {
        Self::Scripted
    }
}

/// Policy selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Policy used by teams without an override
    pub default: PolicyKind,
    /// Per-team overrides, in team order
    pub per_team: Vec<PolicyKind>,
}

impl PolicyConfig {
    pub fn for_team(&self, index: usize) -> &PolicyKind {
        self.per_team.get(index).unwrap_or(&self.default)
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.teams.count == 0 || self.teams.count > MAX_TEAMS {
            return Err(GameError::InvalidConfig(format!(
                "team count must be between 1 and {}, got {}",
                MAX_TEAMS, self.teams.count
            )));
        }

        if self.teams.soldiers_per_team == 0 {
            return Err(GameError::InvalidConfig(
                "soldiers_per_team must be at least 1".into(),
            ));
        }

        if self.economy.area_per_item == 0 {
            return Err(GameError::InvalidConfig(
                "area_per_item must be positive".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.economy.initial_nuke_chance) {
            return Err(GameError::InvalidConfig(format!(
                "initial_nuke_chance must be within [0, 1], got {}",
                self.economy.initial_nuke_chance
            )));
        }

        if self.soldier.health <= 0 || self.base.max_health <= 0 {
            return Err(GameError::InvalidConfig(
                "soldier and base health must be positive".into(),
            ));
        }

        let delays = [
            ("soldier.respawn_delay", self.soldier.respawn_delay),
            ("soldier.nuke_respawn_delay", self.soldier.nuke_respawn_delay),
            ("economy.respawn_delay", self.economy.respawn_delay),
            ("base.alert_cooldown", self.base.alert_cooldown),
        ];
        if let Some((name, value)) = delays.iter().find(|(_, v)| !(v.is_finite() && *v >= 0.0)) {
            return Err(GameError::InvalidConfig(format!(
                "{} must be a finite, non-negative number of seconds, got {}",
                name, value
            )));
        }

        if !(self.scoring.round_duration.is_finite() && self.scoring.round_duration > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "round_duration must be positive, got {}",
                self.scoring.round_duration
            )));
        }

        if self.scoring.best_of == 0 {
            return Err(GameError::InvalidConfig("best_of must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [maze]
            width = 15
            seed = 7

            [scoring]
            floor_at_zero = true

            [scoring.points]
            kill = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.maze.width, 15);
        assert_eq!(config.maze.height, 25);
        assert_eq!(config.maze.seed, 7);
        assert!(config.scoring.floor_at_zero);
        assert_eq!(config.scoring.points.kill, 10);
        assert_eq!(config.scoring.points.base_destroyed, 100);
        assert_eq!(config.base.max_health, 150);
    }

    #[test]
    fn test_policy_overrides() {
        let config = GameConfig::from_toml_str(
            r#"
            [policy]
            default = { kind = "scripted" }
            per_team = [{ kind = "linear", weights_path = "models/red.json" }]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.policy.for_team(0),
            &PolicyKind::Linear {
                weights_path: "models/red.json".into()
            }
        );
        assert_eq!(config.policy.for_team(1), &PolicyKind::Scripted);
    }

    #[test]
    fn test_remote_policy_timeout_default() {
        let config = GameConfig::from_toml_str(
            r#"
            [policy]
            default = { kind = "remote", url = "http://127.0.0.1:8500/score" }
            "#,
        )
        .unwrap();
        assert_eq!(
            config.policy.default,
            PolicyKind::Remote {
                url: "http://127.0.0.1:8500/score".into(),
                timeout_ms: 500
            }
        );
    }

    #[test]
    fn test_rejects_too_many_teams() {
        let mut config = GameConfig::default();
        config.teams.count = 6;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_nan_and_negative_delays() {
        let mut config = GameConfig::default();
        config.soldier.respawn_delay = f64::NAN;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.economy.respawn_delay = -1.0;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.base.alert_cooldown = f64::INFINITY;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = GameConfig::default();
        config.scoring.round_duration = f64::NAN;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_best_of_from_toml() {
        let config = GameConfig::from_toml_str("[scoring]\nbest_of = 5\n").unwrap();
        assert_eq!(config.scoring.best_of, 5);
        assert_eq!(GameConfig::default().scoring.best_of, 3);
        assert!(GameConfig::from_toml_str("[scoring]\nbest_of = 0\n").is_err());
    }

    #[test]
    fn test_rejects_zero_area_per_item() {
        let result = GameConfig::from_toml_str("[economy]\narea_per_item = 0\n");
        assert!(result.is_err());
    }
}
