//! Random forest regressor: an average of independently seeded trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::tree::{RegressionTree, TreeConfig};
use super::{validate_matrix, ModelError};

/// Random forest configuration.
#[derive(Debug, Clone)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features drawn per split (None = all)
    pub max_features: Option<usize>,
    /// Train each tree on a bootstrap resample instead of the full history
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: false,
            seed: 42,
        }
    }
}

/// Random forest model
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Train the forest, building trees in parallel.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        validate_matrix(x)?;
        if x.len() != y.len() {
            return Err(ModelError::TargetMismatch {
                samples: x.len(),
                targets: y.len(),
            });
        }

        let n_samples = x.len();
        let config = &self.config;

        let trees = (0..config.n_trees.max(1))
            .into_par_iter()
            .map(|i| -> Result<RegressionTree, ModelError> {
                let seed = config.seed.wrapping_add(i as u64);
                let mut tree = RegressionTree::new(TreeConfig {
                    max_depth: config.max_depth,
                    min_samples_split: config.min_samples_split,
                    min_samples_leaf: config.min_samples_leaf,
                    max_features: config.max_features,
                    seed,
                });

                if config.bootstrap {
                    let indices = bootstrap_indices(n_samples, seed);
                    tree.fit_indices(x, y, &indices)?;
                } else {
                    tree.fit(x, y)?;
                }
                Ok(tree)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.trees = trees;
        Ok(())
    }

    /// Mean of the tree predictions for a single sample.
    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }

        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_one(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
    // Offset so the resample does not mirror the tree's feature shuffles.
    let mut rng = StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}
