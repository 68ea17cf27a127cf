//! Engine telemetry — read-only aggregation over registry state for
//! dashboards and alerting. Purely derived, no model side effects.

use serde::{Deserialize, Serialize};

use crate::registry::ArmRegistry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmStats {
    pub arm_id: String,
    pub version: String,
    pub active: bool,
    pub trials: u64,
    pub average_reward: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineMetrics {
    pub arm_count: usize,
    pub active_arm_count: usize,
    /// Wall time of the most recent selection, in microseconds.
    pub last_decision_latency_us: u64,
    pub arms: Vec<ArmStats>,
}

/// Snapshot current engine state. Per-arm numbers are read one arm at a
/// time; no cross-arm atomicity is promised or needed.
pub fn collect(registry: &ArmRegistry, last_decision_latency_us: u64) -> EngineMetrics {
    let arms = registry
        .arm_ids()
        .into_iter()
        .filter_map(|id| {
            registry.with_arm(&id, |entry| {
                let trials = entry.model.trials();
                let rate = entry.model.average_reward();
                let ci_width = if trials > 0 {
                    1.96 * (rate * (1.0 - rate) / trials as f64).sqrt()
                } else {
                    0.5
                };
                ArmStats {
                    arm_id: id.clone(),
                    version: entry.definition.version.clone(),
                    active: entry.active,
                    trials,
                    average_reward: rate,
                    confidence_interval_lower: (rate - ci_width).max(0.0),
                    confidence_interval_upper: (rate + ci_width).min(1.0),
                }
            })
        })
        .collect();

    EngineMetrics {
        arm_count: registry.arm_count(),
        active_arm_count: registry.active_arm_count(),
        last_decision_latency_us,
        arms,
    }
}
