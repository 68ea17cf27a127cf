//! Selection policy — LinUCB, Thompson Sampling, and Epsilon-Greedy over
//! each arm's linear model.
//!
//! The random source is injected by the caller so tests can pin a seeded
//! generator; ties break toward the lowest arm id to keep two requests
//! with identical state and context reproducible.

use chrono::{DateTime, Utc};
use postpulse_core::config::AlgorithmConfig;
use postpulse_core::error::{EngineError, EngineResult};
use postpulse_core::types::DecisionContext;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::featurizer::{blend_with_arm, featurize};
use crate::registry::ArmRegistry;

/// One arm choice, with enough detail for the caller to audit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub decision_id: Uuid,
    pub arm_id: String,
    /// Combined score the arm won with (estimate plus exploration term).
    pub score: f64,
    /// How much of the score came from uncertainty rather than the
    /// point estimate.
    pub exploration_bonus: f64,
    pub method: SelectionMethod,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    LinUcb,
    ThompsonSampling,
    EpsilonGreedy,
    /// Epsilon-greedy round that landed on the uniform-exploration branch.
    EpsilonRandom,
}

pub struct SelectionPolicy {
    algorithm: AlgorithmConfig,
}

impl SelectionPolicy {
    pub fn new(algorithm: AlgorithmConfig) -> Self {
        Self { algorithm }
    }

    /// Pick one active arm for `context`.
    ///
    /// Featurizes once, scores every active arm from whatever model state
    /// is currently visible for it (no cross-arm snapshot), and returns the
    /// maximum. Errors only when no active arms exist.
    pub fn select_arm<R: Rng>(
        &self,
        registry: &ArmRegistry,
        context: &DecisionContext,
        rng: &mut R,
    ) -> EngineResult<Decision> {
        let arm_ids = registry.active_arm_ids();
        if arm_ids.is_empty() {
            return Err(EngineError::NoEligibleArms);
        }

        let features = featurize(context);

        if let AlgorithmConfig::EpsilonGreedy { epsilon } = &self.algorithm {
            if rng.gen::<f64>() < *epsilon {
                let idx = rng.gen_range(0..arm_ids.len());
                return Ok(decision(
                    arm_ids[idx].clone(),
                    0.0,
                    0.0,
                    SelectionMethod::EpsilonRandom,
                ));
            }
        }

        let mut best: Option<(&String, f64, f64)> = None;
        for id in &arm_ids {
            // An arm purged between listing and scoring is simply skipped.
            let Some((score, bonus)) = registry.with_arm(id, |entry| {
                let x = blend_with_arm(&features, entry.definition.feature_vector.as_deref());
                let pred = entry.model.predict(x.as_slice());
                match &self.algorithm {
                    AlgorithmConfig::LinUcb { alpha } => {
                        (pred.mean + alpha * pred.width, alpha * pred.width)
                    }
                    AlgorithmConfig::ThompsonSampling => {
                        let sample = pred.mean + pred.width * gaussian_sample(rng);
                        (sample, sample - pred.mean)
                    }
                    AlgorithmConfig::EpsilonGreedy { .. } => (pred.mean, 0.0),
                }
            }) else {
                continue;
            };

            // Strict comparison over ids sorted ascending: lowest id wins ties.
            if best.map_or(true, |(_, best_score, _)| score > best_score) {
                best = Some((id, score, bonus));
            }
        }

        let Some((id, score, bonus)) = best else {
            return Err(EngineError::NoEligibleArms);
        };
        Ok(decision(id.clone(), score, bonus, self.method()))
    }

    fn method(&self) -> SelectionMethod {
        match self.algorithm {
            AlgorithmConfig::LinUcb { .. } => SelectionMethod::LinUcb,
            AlgorithmConfig::ThompsonSampling => SelectionMethod::ThompsonSampling,
            AlgorithmConfig::EpsilonGreedy { .. } => SelectionMethod::EpsilonGreedy,
        }
    }
}

fn decision(arm_id: String, score: f64, bonus: f64, method: SelectionMethod) -> Decision {
    Decision {
        decision_id: Uuid::new_v4(),
        arm_id,
        score,
        exploration_bonus: bonus,
        method,
        decided_at: Utc::now(),
    }
}

/// Approximate standard normal via the sum of twelve uniforms.
fn gaussian_sample<R: Rng>(rng: &mut R) -> f64 {
    (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use postpulse_core::types::{ArmDefinition, Platform};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn def(id: &str) -> ArmDefinition {
        ArmDefinition {
            id: id.to_string(),
            name: id.to_string(),
            parameters: serde_json::json!({}),
            feature_vector: None,
            version: "v1".to_string(),
            created_at: Utc::now(),
        }
    }

    fn registry_with(ids: &[&str]) -> ArmRegistry {
        let registry = ArmRegistry::new(1.0);
        for id in ids {
            registry.add_arm(def(id)).unwrap();
        }
        registry
    }

    fn ctx() -> DecisionContext {
        DecisionContext {
            platform: Platform::Instagram,
            hour_of_day: 12,
            ..DecisionContext::default()
        }
    }

    #[test]
    fn test_no_active_arms_is_an_error() {
        let registry = registry_with(&["a"]);
        registry.deactivate_arm("a");
        let policy = SelectionPolicy::new(AlgorithmConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        let err = policy.select_arm(&registry, &ctx(), &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::NoEligibleArms));
    }

    #[test]
    fn test_cold_ties_break_to_lowest_arm_id() {
        let registry = registry_with(&["bravo", "alpha", "charlie"]);
        let policy = SelectionPolicy::new(AlgorithmConfig::LinUcb { alpha: 1.0 });
        let mut rng = StdRng::seed_from_u64(7);
        let decision = policy.select_arm(&registry, &ctx(), &mut rng).unwrap();
        assert_eq!(decision.arm_id, "alpha");
        assert_eq!(decision.method, SelectionMethod::LinUcb);
    }

    #[test]
    fn test_linucb_prefers_trained_high_reward_arm() {
        let registry = registry_with(&["good", "poor"]);
        let context = ctx();
        let x = featurize(&context);
        for _ in 0..100 {
            registry
                .with_arm_mut("good", |e| e.model.observe(x.as_slice(), 0.9))
                .unwrap();
            registry
                .with_arm_mut("poor", |e| e.model.observe(x.as_slice(), 0.1))
                .unwrap();
        }

        let policy = SelectionPolicy::new(AlgorithmConfig::LinUcb { alpha: 1.0 });
        let mut rng = StdRng::seed_from_u64(7);
        let decision = policy.select_arm(&registry, &context, &mut rng).unwrap();
        assert_eq!(decision.arm_id, "good");
    }

    #[test]
    fn test_thompson_is_reproducible_under_a_pinned_seed() {
        let context = ctx();
        let pick = |seed: u64| {
            let registry = registry_with(&["a", "b", "c"]);
            let policy = SelectionPolicy::new(AlgorithmConfig::ThompsonSampling);
            let mut rng = StdRng::seed_from_u64(seed);
            policy
                .select_arm(&registry, &context, &mut rng)
                .unwrap()
                .arm_id
        };
        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn test_epsilon_zero_is_pure_greedy() {
        let registry = registry_with(&["good", "poor"]);
        let context = ctx();
        let x = featurize(&context);
        for _ in 0..50 {
            registry
                .with_arm_mut("good", |e| e.model.observe(x.as_slice(), 0.9))
                .unwrap();
            registry
                .with_arm_mut("poor", |e| e.model.observe(x.as_slice(), 0.1))
                .unwrap();
        }

        let policy = SelectionPolicy::new(AlgorithmConfig::EpsilonGreedy { epsilon: 0.0 });
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let decision = policy.select_arm(&registry, &context, &mut rng).unwrap();
            assert_eq!(decision.arm_id, "good");
            assert_eq!(decision.method, SelectionMethod::EpsilonGreedy);
        }
    }

    #[test]
    fn test_all_default_context_still_selects() {
        let registry = registry_with(&["a"]);
        let policy = SelectionPolicy::new(AlgorithmConfig::default());
        let mut rng = StdRng::seed_from_u64(7);
        let decision = policy
            .select_arm(&registry, &DecisionContext::default(), &mut rng)
            .unwrap();
        assert_eq!(decision.arm_id, "a");
    }
}
