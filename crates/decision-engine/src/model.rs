//! Per-arm statistical model — Bayesian linear regression with a ridge
//! prior, the sufficient statistics behind LinUCB scoring and Thompson
//! sampling.
//!
//! The inverse design matrix is kept current with a Sherman–Morrison
//! rank-one update, so both `observe` and `predict` cost O(d²) in the
//! feature dimensionality and never touch reward history.

use serde::{Deserialize, Serialize};

/// Point estimate plus uncertainty for one (arm, feature vector) pair.
#[derive(Debug, Clone, Copy)]
pub struct Prediction {
    /// Posterior mean of expected reward.
    pub mean: f64,
    /// Confidence width, `sqrt(x' A⁻¹ x)`. Maximal for a cold-start arm
    /// and shrinks as observations accumulate.
    pub width: f64,
}

/// Mutable statistical state for one arm. Owned exclusively by the
/// registry entry; updated incrementally, never rebuilt from history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmModel {
    dim: usize,
    trials: u64,
    reward_sum: f64,
    /// Row-major d×d inverse of the regularized design matrix A = λI + Σxx'.
    a_inv: Vec<f64>,
    /// Reward-weighted feature sums, b = Σ r·x.
    b: Vec<f64>,
}

impl ArmModel {
    /// Fresh model with no observations. `ridge_lambda` is the prior
    /// precision; non-positive values are clamped to a small positive one.
    pub fn cold_start(dim: usize, ridge_lambda: f64) -> Self {
        let lambda = if ridge_lambda > 0.0 {
            ridge_lambda
        } else {
            1e-6
        };
        let mut a_inv = vec![0.0; dim * dim];
        for i in 0..dim {
            a_inv[i * dim + i] = 1.0 / lambda;
        }
        Self {
            dim,
            trials: 0,
            reward_sum: 0.0,
            a_inv,
            b: vec![0.0; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn reward_sum(&self) -> f64 {
        self.reward_sum
    }

    /// Cumulative average reward over all observations, 0.0 when cold.
    pub fn average_reward(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.reward_sum / self.trials as f64
        }
    }

    /// Posterior mean and confidence width at `x`. O(d²).
    pub fn predict(&self, x: &[f64]) -> Prediction {
        let ax = self.mat_vec(x);
        let mean: f64 = self.b.iter().zip(&ax).map(|(bi, axi)| bi * axi).sum();
        let variance: f64 = x.iter().zip(&ax).map(|(xi, axi)| xi * axi).sum();
        Prediction {
            mean,
            width: variance.max(0.0).sqrt(),
        }
    }

    /// Fold one observed reward at `x` into the sufficient statistics.
    /// Sherman–Morrison keeps `a_inv` exact without re-inverting. O(d²).
    pub fn observe(&mut self, x: &[f64], reward: f64) {
        let ax = self.mat_vec(x);
        let denom = 1.0 + x.iter().zip(&ax).map(|(xi, axi)| xi * axi).sum::<f64>();

        for i in 0..self.dim {
            for j in 0..self.dim {
                self.a_inv[i * self.dim + j] -= ax[i] * ax[j] / denom;
            }
        }
        for (bi, xi) in self.b.iter_mut().zip(x) {
            *bi += reward * xi;
        }

        self.trials += 1;
        self.reward_sum += reward;
    }

    /// A⁻¹ · x. Inputs shorter than `dim` are treated as zero-padded.
    fn mat_vec(&self, x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.dim];
        let n = x.len().min(self.dim);
        for i in 0..self.dim {
            let row = &self.a_inv[i * self.dim..i * self.dim + n];
            out[i] = row.iter().zip(&x[..n]).map(|(a, xi)| a * xi).sum();
        }
        out
    }
}
