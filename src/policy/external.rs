//! Policies backed by an external scoring model
//!
//! A model scores the six discrete actions; the policy takes the argmax.
//! Model failures never stall a soldier: the policy logs and falls back to
//! a harmless pickup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::policy::ActionPolicy;
use crate::simulation::action::{Action, ACTION_COUNT};
use crate::simulation::observation::Observation;

/// Scores every action for one observation
pub trait ActionModel {
    fn name(&self) -> &str;

    /// One score per action, in `Action::index` order
    fn score_actions(&mut self, features: &[f32], observation: &Observation<'_>) -> Result<[f32; ACTION_COUNT]>;
}

pub struct ExternalModelPolicy {
    model: Box<dyn ActionModel>,
    name: String,
}

impl ExternalModelPolicy {
    pub fn new(model: Box<dyn ActionModel>) -> Self {
        let name = format!("external:{}", model.name());
        Self { model, name }
    }
}

/// Index of the highest score; earlier actions win ties, NaN never wins
fn argmax(scores: &[f32; ACTION_COUNT]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if scores[best].is_nan() || *score > scores[best] {
            best = i;
        }
    }
    best
}

impl ActionPolicy for ExternalModelPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(&mut self, observation: &Observation<'_>) -> Action {
        let features = observation.to_vector();
        match self.model.score_actions(&features, observation) {
            Ok(scores) => Action::from_index(argmax(&scores)).unwrap_or(Action::PickupIfPresent),
            Err(e) => {
                tracing::warn!(model = self.model.name(), soldier = %observation.soldier, error = %e, "Model failed, falling back to pickup");
                Action::PickupIfPresent
            }
        }
    }
}

/// Weight file for `LinearActionModel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    /// Fixed input width; observations are zero-padded or truncated to it
    pub input_size: usize,
    /// One row of `input_size` weights per action
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

/// `scores = W * x + b` over the flattened observation
#[derive(Debug, Clone)]
pub struct LinearActionModel {
    weights: LinearWeights,
}

impl LinearActionModel {
    pub fn new(weights: LinearWeights) -> Result<Self> {
        if weights.weights.len() != ACTION_COUNT || weights.bias.len() != ACTION_COUNT {
            return Err(GameError::PolicyError(format!(
                "expected {} weight rows and biases, got {} and {}",
                ACTION_COUNT,
                weights.weights.len(),
                weights.bias.len()
            )));
        }
        if let Some(row) = weights.weights.iter().find(|row| row.len() != weights.input_size) {
            return Err(GameError::PolicyError(format!(
                "weight row has {} entries, input_size is {}",
                row.len(),
                weights.input_size
            )));
        }
        Ok(Self { weights })
    }

    /// Load weights from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let weights: LinearWeights = serde_json::from_str(&content)?;
        tracing::info!(path = %path.display(), input_size = weights.input_size, "Loaded linear model weights");
        Self::new(weights)
    }

    fn fit_input(&self, features: &[f32]) -> Vec<f32> {
        let mut input = features.to_vec();
        input.resize(self.weights.input_size, 0.0);
        input
    }
}

impl ActionModel for LinearActionModel {
    fn name(&self) -> &str {
        "linear"
    }

    fn score_actions(&mut self, features: &[f32], _observation: &Observation<'_>) -> Result<[f32; ACTION_COUNT]> {
        let input = self.fit_input(features);
        let mut scores = [0.0; ACTION_COUNT];
        for (i, score) in scores.iter_mut().enumerate() {
            let dot: f32 = self.weights.weights[i].iter().zip(&input).map(|(w, x)| w * x).sum();
            *score = dot + self.weights.bias[i];
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CellPos, Direction, SoldierId, TeamId};
    use crate::maze::grid::Grid;

    fn observation(grid: &Grid) -> Observation<'_> {
        Observation {
            grid,
            time: 0.0,
            soldier: SoldierId(0),
            team: TeamId(0),
            alive: true,
            position: CellPos::new(2, 3),
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

    fn weights(input_size: usize) -> LinearWeights {
        LinearWeights {
            input_size,
            weights: vec![vec![0.0; input_size]; ACTION_COUNT],
            bias: vec![0.0; ACTION_COUNT],
        }
    }

    struct FailingModel;

    impl ActionModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        fn score_actions(&mut self, _: &[f32], _: &Observation<'_>) -> Result<[f32; ACTION_COUNT]> {
            Err(GameError::PolicyError("offline".into()))
        }
    }

    #[test]
    fn test_argmax_prefers_first_on_ties_and_skips_nan() {
        assert_eq!(argmax(&[0.0, 1.0, 1.0, 0.0, 0.0, 0.0]), 1);
        assert_eq!(argmax(&[f32::NAN, 0.5, 0.0, 0.0, 0.0, 0.0]), 1);
    }

    #[test]
    fn test_linear_model_uses_bias_and_features() {
        let grid = Grid::open(5, 5);
        let obs = observation(&grid);

        let mut w = weights(4);
        w.bias[Action::Attack.index()] = 0.5;
        // Weight on the x feature for "right"
        w.weights[Action::Move(Direction::Right).index()][1] = 1.0;
        let model = LinearActionModel::new(w).unwrap();
        let mut policy = ExternalModelPolicy::new(Box::new(model));

        // x = 2 beats the 0.5 attack bias
        assert_eq!(policy.choose_action(&obs), Action::Move(Direction::Right));
        assert_eq!(policy.name(), "external:linear");
    }

    #[test]
    fn test_linear_model_pads_and_truncates() {
        let grid = Grid::open(5, 5);
        let obs = observation(&grid);
        let mut model = LinearActionModel::new(weights(2)).unwrap();
        assert_eq!(model.fit_input(&[1.0, 2.0, 3.0]), vec![1.0, 2.0]);
        let mut wide = LinearActionModel::new(weights(5)).unwrap();
        assert_eq!(wide.fit_input(&[1.0]), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(model.score_actions(&[1.0, 2.0, 3.0], &obs).is_ok());
        assert!(wide.score_actions(&[], &obs).is_ok());
    }

    #[test]
    fn test_linear_model_rejects_bad_shapes() {
        let mut w = weights(3);
        w.weights.pop();
        assert!(LinearActionModel::new(w).is_err());

        let mut w = weights(3);
        w.weights[2].push(1.0);
        assert!(LinearActionModel::new(w).is_err());
    }

    #[test]
    fn test_load_weights_from_json() {
        let path = std::env::temp_dir().join(format!("flag_maze_weights_{}.json", std::process::id()));
        fs::write(&path, serde_json::to_string(&weights(3)).unwrap()).unwrap();
        let model = LinearActionModel::load(&path);
        let _ = fs::remove_file(&path);
        assert!(model.is_ok());
    }

    #[test]
    fn test_model_error_falls_back_to_pickup() {
        let grid = Grid::open(5, 5);
        let mut policy = ExternalModelPolicy::new(Box::new(FailingModel));
        assert_eq!(policy.choose_action(&observation(&grid)), Action::PickupIfPresent);
    }
}
