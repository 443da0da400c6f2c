//! Bagged random-forest regressor
//!
//! Trees are fit in parallel on bootstrap samples, each with a seed
//! derived from the forest seed so fits are reproducible regardless of
//! thread scheduling. Prediction is the mean over trees.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeConfig};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; None means all
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// A fitted forest of regression trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    /// Fit the ensemble on a feature matrix against targets
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) {
        debug_assert_eq!(features.len(), targets.len());

        self.trees = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let tree_seed = self.config.seed.wrapping_add(i as u64);
                let tree_config = TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: self.config.max_features,
                    seed: tree_seed,
                };

                let (sample_features, sample_targets) =
                    bootstrap_sample(features, targets, tree_seed);

                let mut tree = RegressionTree::new(tree_config);
                tree.fit(&sample_features, &sample_targets);
                tree
            })
            .collect();
    }

    /// Predict a single row: mean over all trees
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict_one(row)).sum();
        sum / self.trees.len() as f64
    }

    /// Predict a batch of rows
    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.par_iter().map(|r| self.predict_one(r)).collect()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Sample with replacement, seeded per tree
fn bootstrap_sample(
    features: &[Vec<f64>],
    targets: &[f64],
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let n = features.len();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut sample_features = Vec::with_capacity(n);
    let mut sample_targets = Vec::with_capacity(n);
    for _ in 0..n {
        let i = rng.gen_range(0..n);
        sample_features.push(features[i].clone());
        sample_targets.push(targets[i]);
    }

    (sample_features, sample_targets)
}
