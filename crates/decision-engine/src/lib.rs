//! Contextual decision engine — chooses which content-optimization
//! strategy ("arm") to apply to a post and learns online from engagement
//! outcomes. LinUCB, Thompson Sampling, and Epsilon-Greedy policies over
//! per-arm Bayesian linear models.

pub mod engine;
pub mod featurizer;
pub mod learner;
pub mod metrics;
pub mod model;
pub mod policy;
pub mod registry;

pub use engine::DecisionEngine;
pub use featurizer::{featurize, FeatureVector, FEATURE_DIM};
pub use learner::{apply_reward, RewardOutcome};
pub use metrics::{ArmStats, EngineMetrics};
pub use model::{ArmModel, Prediction};
pub use policy::{Decision, SelectionMethod, SelectionPolicy};
pub use registry::{ArmEntry, ArmRegistry};
