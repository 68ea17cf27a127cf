//! Reward learner — folds engagement outcomes into the chosen arm's model.
//!
//! Updates are incremental and per-arm; a reward for an arm that no longer
//! exists is dropped with a warning, never applied elsewhere and never
//! fatal to the caller's flow.

use postpulse_core::types::RewardEvent;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::featurizer::{blend_with_arm, featurize};
use crate::registry::ArmRegistry;

/// What happened to a reported reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardOutcome {
    /// Folded into the target arm's statistics.
    Applied,
    /// Target arm was purged before the outcome arrived; dropped.
    Stale,
}

/// Apply one reward event to its target arm.
///
/// The context is re-featurized with the same featurizer used at selection
/// time, so the update lands on the exact vector the decision saw. The
/// reward is clamped into [0, 1]. The read-modify-write happens under the
/// arm's entry lock, so concurrent rewards for the same arm all land.
pub fn apply_reward(registry: &ArmRegistry, event: &RewardEvent) -> RewardOutcome {
    let reward = event.reward.clamp(0.0, 1.0);
    let features = featurize(&event.context);

    let applied = registry.with_arm_mut(&event.arm_id, |entry| {
        let x = blend_with_arm(&features, entry.definition.feature_vector.as_deref());
        entry.model.observe(x.as_slice(), reward);
        entry.model.trials()
    });

    match applied {
        Some(trials) => {
            debug!(arm_id = %event.arm_id, reward, trials, "reward applied");
            RewardOutcome::Applied
        }
        None => {
            warn!(arm_id = %event.arm_id, reward, "stale reward dropped: arm no longer registered");
            RewardOutcome::Stale
        }
    }
}
