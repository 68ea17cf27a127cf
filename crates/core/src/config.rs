use serde::Deserialize;

/// Decision-engine configuration. Loaded from environment variables with
/// the prefix `POSTPULSE__` and falls back to built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub algorithm: AlgorithmConfig,
    /// Ridge prior on each arm's linear model. Larger values shrink the
    /// cold-start uncertainty more slowly.
    #[serde(default = "default_ridge_lambda")]
    pub ridge_lambda: f64,
}

/// Exploration rule used by the selection policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", tag = "name")]
pub enum AlgorithmConfig {
    /// Contextual upper-confidence bound; `alpha` scales the bonus.
    LinUcb {
        #[serde(default = "default_alpha")]
        alpha: f64,
    },
    /// Posterior sampling over the same linear statistics.
    ThompsonSampling,
    /// Uniform exploration with probability `epsilon`, greedy otherwise.
    EpsilonGreedy {
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self::LinUcb {
            alpha: default_alpha(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmConfig::default(),
            ridge_lambda: default_ridge_lambda(),
        }
    }
}

fn default_alpha() -> f64 {
    1.0
}

fn default_epsilon() -> f64 {
    0.1
}

fn default_ridge_lambda() -> f64 {
    1.0
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("POSTPULSE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert!((cfg.ridge_lambda - 1.0).abs() < f64::EPSILON);
        match cfg.algorithm {
            AlgorithmConfig::LinUcb { alpha } => assert!((alpha - 1.0).abs() < f64::EPSILON),
            other => panic!("unexpected default algorithm: {other:?}"),
        }
    }

    #[test]
    fn test_algorithm_deserializes_from_tagged_form() {
        let cfg: AlgorithmConfig =
            serde_json::from_str(r#"{"name":"epsilon_greedy","epsilon":0.25}"#).unwrap();
        match cfg {
            AlgorithmConfig::EpsilonGreedy { epsilon } => {
                assert!((epsilon - 0.25).abs() < f64::EPSILON)
            }
            other => panic!("unexpected algorithm: {other:?}"),
        }
    }
}
