//! Scoring model served over HTTP
//!
//! The model itself runs out of process. Each decision posts the soldier's
//! flattened observation and reads back one score per action:
//!
//! ```text
//! POST {url}  {"soldier": 3, "team": 1, "time": 12.0, "features": [25.0, 4.0, 7.0, ...]}
//! 200         {"scores": [0.1, 0.0, 0.7, 0.0, 0.2, 0.0]}
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::core::error::{GameError, Result};
use crate::core::types::{SimTime, SoldierId, TeamId};
use crate::policy::external::ActionModel;
use crate::simulation::action::ACTION_COUNT;
use crate::simulation::observation::Observation;

/// Body of one scoring request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRequest<'a> {
    pub soldier: SoldierId,
    pub team: TeamId,
    pub time: SimTime,
    pub features: &'a [f32],
}

/// Body of a scoring reply, scores in `Action::index` order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreReply {
    pub scores: Vec<f32>,
}

impl ScoreReply {
    pub fn into_scores(self) -> Result<[f32; ACTION_COUNT]> {
        <[f32; ACTION_COUNT]>::try_from(self.scores.as_slice()).map_err(|_| {
            GameError::RemoteModel(format!(
                "expected {} scores, got {}",
                ACTION_COUNT,
                self.scores.len()
            ))
        })
    }
}

/// Async HTTP client for one scoring endpoint
pub struct ScoringClient {
    client: Client,
    url: String,
}

impl ScoringClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GameError::RemoteModel(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn score(&self, request: &ScoreRequest<'_>) -> Result<[f32; ACTION_COUNT]> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| GameError::RemoteModel(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GameError::RemoteModel(format!("{} returned {}: {}", self.url, status, body)));
        }

        let reply: ScoreReply = response
            .json()
            .await
            .map_err(|e| GameError::RemoteModel(format!("bad reply from {}: {}", self.url, e)))?;
        reply.into_scores()
    }
}

/// Blocking `ActionModel` over a `ScoringClient`
///
/// Owns a current-thread runtime so the policy interface stays synchronous.
pub struct RemoteActionModel {
    client: ScoringClient,
    runtime: Runtime,
}

impl RemoteActionModel {
    pub fn new(url: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let client = ScoringClient::new(url, Duration::from_millis(timeout_ms))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        tracing::info!(url = client.url(), timeout_ms, "Remote scoring model ready");
        Ok(Self { client, runtime })
    }
}

impl ActionModel for RemoteActionModel {
    fn name(&self) -> &str {
        "remote"
    }

    fn score_actions(&mut self, features: &[f32], observation: &Observation<'_>) -> Result<[f32; ACTION_COUNT]> {
        let request = ScoreRequest {
            soldier: observation.soldier,
            team: observation.team,
            time: observation.time,
            features,
        };
        let scores = self.runtime.block_on(self.client.score(&request))?;
        tracing::debug!(soldier = %observation.soldier, ?scores, "Remote scores");
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CellPos, Direction};
    use crate::maze::grid::Grid;
    use crate::policy::{ActionPolicy, ExternalModelPolicy};
    use crate::simulation::action::Action;

    fn observation(grid: &Grid) -> Observation<'_> {
        Observation {
            grid,
            time: 4.0,
            soldier: SoldierId(3),
            team: TeamId(1),
            alive: true,
            position: CellPos::new(1, 2),
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

    #[test]
    fn test_request_body_shape() {
        let features: [f32; 3] = [25.0, 1.0, 2.0];
        let request = ScoreRequest {
            soldier: SoldierId(3),
            team: TeamId(1),
            time: 4.0,
            features: &features,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"soldier": 3, "team": 1, "time": 4.0, "features": [25.0, 1.0, 2.0]})
        );
    }

    #[test]
    fn test_reply_needs_one_score_per_action() {
        let reply: ScoreReply = serde_json::from_str(r#"{"scores": [0, 0, 1, 0, 0, 0]}"#).unwrap();
        let scores = reply.into_scores().unwrap();
        assert_eq!(scores[Action::Move(Direction::Right).index()], 1.0);

        let short: ScoreReply = serde_json::from_str(r#"{"scores": [1, 2]}"#).unwrap();
        assert!(matches!(short.into_scores(), Err(GameError::RemoteModel(_))));
    }

    #[test]
    fn test_unreachable_endpoint_falls_back_to_pickup() {
        // Port 9 (discard) is closed on test hosts, so the connection is refused
        let model = RemoteActionModel::new("http://127.0.0.1:9/score", 200).unwrap();
        let mut policy = ExternalModelPolicy::new(Box::new(model));
        let grid = Grid::open(3, 3);
        assert_eq!(policy.choose_action(&observation(&grid)), Action::PickupIfPresent);
        assert_eq!(policy.name(), "external:remote");
    }
}
