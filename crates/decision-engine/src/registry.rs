//! Arm registry — the catalogue of selectable strategies and the single
//! owner of every arm's mutable statistical model.
//!
//! Entries live in a `DashMap`, so locking is per arm: learning on one arm
//! never blocks selection or learning on another, and a read-modify-write
//! under `get_mut` can never drop a concurrent update.

use dashmap::DashMap;
use postpulse_core::error::{EngineError, EngineResult};
use postpulse_core::types::{ArmDefinition, ReplaceMode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::featurizer::FEATURE_DIM;
use crate::model::ArmModel;

/// One registered arm: definition, eligibility flag, and its model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmEntry {
    pub definition: ArmDefinition,
    pub active: bool,
    pub model: ArmModel,
}

/// Serialized registry state for host-side persistence.
pub type RegistrySnapshot = Vec<ArmEntry>;

pub struct ArmRegistry {
    arms: DashMap<String, ArmEntry>,
    ridge_lambda: f64,
}

impl ArmRegistry {
    pub fn new(ridge_lambda: f64) -> Self {
        Self {
            arms: DashMap::new(),
            ridge_lambda,
        }
    }

    /// Register a new arm with a cold-start model.
    pub fn add_arm(&self, definition: ArmDefinition) -> EngineResult<()> {
        if self.arms.contains_key(&definition.id) {
            return Err(EngineError::DuplicateArm {
                id: definition.id.clone(),
            });
        }
        let id = definition.id.clone();
        self.arms.insert(
            id.clone(),
            ArmEntry {
                definition,
                active: true,
                model: ArmModel::cold_start(FEATURE_DIM, self.ridge_lambda),
            },
        );
        info!(arm_id = %id, "arm registered");
        Ok(())
    }

    /// Replace an arm's definition (e.g. a version bump). The learned model
    /// is preserved unless the caller explicitly asks for a reset; either
    /// way the arm's eligibility flag carries over. Inserts the arm if the
    /// id was previously unknown.
    pub fn replace_arm(&self, definition: ArmDefinition, mode: ReplaceMode) {
        let id = definition.id.clone();
        match self.arms.get_mut(&id) {
            Some(mut entry) => {
                if mode == ReplaceMode::ResetStatistics {
                    entry.model = ArmModel::cold_start(FEATURE_DIM, self.ridge_lambda);
                }
                let old_version = entry.definition.version.clone();
                entry.definition = definition;
                info!(
                    arm_id = %id,
                    %old_version,
                    new_version = %entry.definition.version,
                    reset = mode == ReplaceMode::ResetStatistics,
                    "arm replaced"
                );
            }
            None => {
                // Unknown id: replacement degrades to a plain insert.
                let _ = self.add_arm(definition);
            }
        }
    }

    pub fn get_arm(&self, id: &str) -> Option<ArmDefinition> {
        self.arms.get(id).map(|entry| entry.definition.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.arms.contains_key(id)
    }

    /// Remove the arm from selection eligibility. Its model is retained.
    pub fn deactivate_arm(&self, id: &str) -> bool {
        match self.arms.get_mut(id) {
            Some(mut entry) => {
                entry.active = false;
                info!(arm_id = %id, "arm deactivated");
                true
            }
            None => false,
        }
    }

    pub fn reactivate_arm(&self, id: &str) -> bool {
        match self.arms.get_mut(id) {
            Some(mut entry) => {
                entry.active = true;
                info!(arm_id = %id, "arm reactivated");
                true
            }
            None => false,
        }
    }

    /// Delete an arm and its accumulated statistics. Distinct from
    /// deactivation: this is the explicit, irreversible purge.
    pub fn purge_arm(&self, id: &str) -> bool {
        let removed = self.arms.remove(id).is_some();
        if removed {
            info!(arm_id = %id, "arm purged");
        }
        removed
    }

    /// Ids of arms eligible for selection, sorted so iteration order (and
    /// therefore tie-breaking) is deterministic.
    pub fn active_arm_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .arms
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All registered ids, active or not, sorted.
    pub fn arm_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.arms.iter().map(|entry| entry.key().clone()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn arm_count(&self) -> usize {
        self.arms.len()
    }

    pub fn active_arm_count(&self) -> usize {
        self.arms.iter().filter(|entry| entry.active).count()
    }

    /// Read access to one entry under its shard lock.
    pub fn with_arm<T>(&self, id: &str, f: impl FnOnce(&ArmEntry) -> T) -> Option<T> {
        self.arms.get(id).map(|entry| f(entry.value()))
    }

    /// Exclusive access to one entry. All model mutation goes through here,
    /// so concurrent updates to the same arm serialize instead of racing.
    pub fn with_arm_mut<T>(&self, id: &str, f: impl FnOnce(&mut ArmEntry) -> T) -> Option<T> {
        self.arms.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    /// Export every entry for persistence by the host store.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut entries: Vec<ArmEntry> = self.arms.iter().map(|e| e.value().clone()).collect();
        entries.sort_unstable_by(|a, b| a.definition.id.cmp(&b.definition.id));
        entries
    }

    /// Rebuild registry contents from a snapshot, replacing any entries
    /// whose ids collide.
    pub fn restore(&self, snapshot: RegistrySnapshot) {
        for entry in snapshot {
            self.arms.insert(entry.definition.id.clone(), entry);
        }
    }
}
