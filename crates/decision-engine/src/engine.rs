//! Decision engine facade — the surface the scheduler and the
//! content-optimization service call: `add_arm`, `select_arm`,
//! `update_reward`, `metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use postpulse_core::config::EngineConfig;
use postpulse_core::error::EngineResult;
use postpulse_core::types::{ArmDefinition, DecisionContext, ReplaceMode, RewardEvent};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::learner::{apply_reward, RewardOutcome};
use crate::metrics::{self, EngineMetrics};
use crate::policy::{Decision, SelectionPolicy};
use crate::registry::{ArmRegistry, RegistrySnapshot};

pub struct DecisionEngine {
    registry: ArmRegistry,
    policy: SelectionPolicy,
    rng: Mutex<StdRng>,
    last_decision_latency_us: AtomicU64,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Build an engine whose random source is seeded explicitly, so two
    /// engines with the same seed, arms, and contexts decide identically.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self {
            registry: ArmRegistry::new(config.ridge_lambda),
            policy: SelectionPolicy::new(config.algorithm),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            last_decision_latency_us: AtomicU64::new(0),
        }
    }

    pub fn add_arm(&self, definition: ArmDefinition) -> EngineResult<()> {
        self.registry.add_arm(definition)
    }

    pub fn replace_arm(&self, definition: ArmDefinition, mode: ReplaceMode) {
        self.registry.replace_arm(definition, mode)
    }

    pub fn deactivate_arm(&self, id: &str) -> bool {
        self.registry.deactivate_arm(id)
    }

    pub fn reactivate_arm(&self, id: &str) -> bool {
        self.registry.reactivate_arm(id)
    }

    pub fn purge_arm(&self, id: &str) -> bool {
        self.registry.purge_arm(id)
    }

    /// Choose one active arm for `context` and record the decision latency.
    pub fn select_arm(&self, context: &DecisionContext) -> EngineResult<Decision> {
        let started = Instant::now();
        let result = {
            let mut rng = self.rng.lock();
            self.policy.select_arm(&self.registry, context, &mut *rng)
        };
        let elapsed_us = started.elapsed().as_micros() as u64;
        self.last_decision_latency_us
            .store(elapsed_us, Ordering::Relaxed);

        if let Ok(decision) = &result {
            debug!(
                arm_id = %decision.arm_id,
                score = decision.score,
                elapsed_us,
                "arm selected"
            );
        }
        result
    }

    /// Report an engagement outcome. Never fails the caller: a reward for
    /// a purged arm is dropped and reported as `Stale`.
    pub fn update_reward(&self, event: &RewardEvent) -> RewardOutcome {
        apply_reward(&self.registry, event)
    }

    pub fn metrics(&self) -> EngineMetrics {
        metrics::collect(
            &self.registry,
            self.last_decision_latency_us.load(Ordering::Relaxed),
        )
    }

    /// Direct registry access, for callers that persist snapshots or drive
    /// the policy with their own random source.
    pub fn registry(&self) -> &ArmRegistry {
        &self.registry
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }

    pub fn restore(&self, snapshot: RegistrySnapshot) {
        self.registry.restore(snapshot)
    }
}
