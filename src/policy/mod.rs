//! Action policies: who decides what a soldier does next
//!
//! Policies only read an `Observation` and return an `Action`; the match
//! runner submits the action to the world.

pub mod external;
pub mod remote;
pub mod scripted;

use crate::core::config::PolicyKind;
use crate::core::error::Result;
use crate::simulation::action::Action;
use crate::simulation::observation::Observation;

pub use external::{ActionModel, ExternalModelPolicy, LinearActionModel, LinearWeights};
pub use remote::{RemoteActionModel, ScoringClient};
pub use scripted::ScriptedPolicy;

/// Chooses one action per turn for a soldier
pub trait ActionPolicy {
    fn name(&self) -> &str;

    fn choose_action(&mut self, observation: &Observation<'_>) -> Action;
}

/// Construct the policy described by `kind`
pub fn build_policy(kind: &PolicyKind, seed: u64) -> Result<Box<dyn ActionPolicy>> {
    let policy: Box<dyn ActionPolicy> = match kind {
        PolicyKind::Scripted => Box::new(ScriptedPolicy::new(seed)),
        PolicyKind::Linear { weights_path } => {
            let model = LinearActionModel::load(std::path::Path::new(weights_path))?;
            Box::new(ExternalModelPolicy::new(Box::new(model)))
        }
        PolicyKind::Remote { url, timeout_ms } => {
            let model = RemoteActionModel::new(url.clone(), *timeout_ms)?;
            Box::new(ExternalModelPolicy::new(Box::new(model)))
        }
    };
    tracing::debug!(policy = policy.name(), "Policy ready");
    Ok(policy)
}
