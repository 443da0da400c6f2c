//! Regression tree for the forest ensemble
//!
//! Variance-reduction splits over midpoint thresholds, bounded depth and
//! leaf sizes, seeded feature subsampling. Only what the forest needs.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; None means all
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    feature_idx: Option<usize>,
    threshold: Option<f64>,
    /// Mean target at this node; the prediction for leaves
    value: f64,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(value: f64) -> Self {
        Self {
            feature_idx: None,
            threshold: None,
            value,
            left: None,
            right: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A fitted regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    config: TreeConfig,
    root: Option<Node>,
}

impl RegressionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Fit on a feature matrix (rows) against targets
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) {
        debug_assert_eq!(features.len(), targets.len());
        let indices: Vec<usize> = (0..features.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.build(features, targets, &indices, 0, &mut rng));
    }

    fn build(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> Node {
        let node_targets: Vec<f64> = indices.iter().map(|&i| targets[i]).collect();
        let node_mean = mean(&node_targets);
        let node_impurity = variance(&node_targets, node_mean);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || node_impurity < 1e-10
        {
            return Node::leaf(node_mean);
        }

        match self.best_split(features, targets, indices, node_impurity, rng) {
            Some((feature_idx, threshold, left_idx, right_idx)) => {
                if left_idx.len() < self.config.min_samples_leaf
                    || right_idx.len() < self.config.min_samples_leaf
                {
                    return Node::leaf(node_mean);
                }

                let left = self.build(features, targets, &left_idx, depth + 1, rng);
                let right = self.build(features, targets, &right_idx, depth + 1, rng);

                Node {
                    feature_idx: Some(feature_idx),
                    threshold: Some(threshold),
                    value: node_mean,
                    left: Some(Box::new(left)),
                    right: Some(Box::new(right)),
                }
            }
            None => Node::leaf(node_mean),
        }
    }

    #[allow(clippy::type_complexity)]
    fn best_split(
        &self,
        features: &[Vec<f64>],
        targets: &[f64],
        indices: &[usize],
        parent_impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
        let n_features = features.first().map(|r| r.len()).unwrap_or(0);
        let max_features = self.config.max_features.unwrap_or(n_features).min(n_features);

        let mut feature_indices: Vec<usize> = (0..n_features).collect();
        feature_indices.shuffle(rng);
        feature_indices.truncate(max_features);

        let mut best_gain = 0.0;
        let mut best: Option<(usize, f64, Vec<usize>, Vec<usize>)> = None;

        for &feature_idx in &feature_indices {
            let mut values: Vec<f64> = indices.iter().map(|&i| features[i][feature_idx]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();

            for window in values.windows(2) {
                let threshold = (window[0] + window[1]) / 2.0;

                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| features[i][feature_idx] <= threshold);

                if left_idx.is_empty() || right_idx.is_empty() {
                    continue;
                }

                let left_targets: Vec<f64> = left_idx.iter().map(|&i| targets[i]).collect();
                let right_targets: Vec<f64> = right_idx.iter().map(|&i| targets[i]).collect();

                let left_impurity = variance(&left_targets, mean(&left_targets));
                let right_impurity = variance(&right_targets, mean(&right_targets));

                let n_left = left_idx.len() as f64;
                let n_right = right_idx.len() as f64;
                let weighted = (n_left * left_impurity + n_right * right_impurity)
                    / (n_left + n_right);
                let gain = parent_impurity - weighted;

                if gain > best_gain {
                    best_gain = gain;
                    best = Some((feature_idx, threshold, left_idx, right_idx));
                }
            }
        }

        best
    }

    /// Predict a single row
    pub fn predict_one(&self, row: &[f64]) -> f64 {
        let mut node = match &self.root {
            Some(node) => node,
            None => return 0.0,
        };

        loop {
            if node.is_leaf() {
                return node.value;
            }
            // Split nodes always carry both children and split params
            let (Some(feature_idx), Some(threshold), Some(left), Some(right)) = (
                node.feature_idx,
                node.threshold,
                node.left.as_deref(),
                node.right.as_deref(),
            ) else {
                return node.value;
            };

            node = if row[feature_idx] <= threshold { left } else { right };
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_step_function() {
        // y jumps at x = 5
        let features: Vec<Vec<f64>> = (0..100).map(|i| vec![i as f64 / 10.0]).collect();
        let targets: Vec<f64> = features
            .iter()
            .map(|r| if r[0] > 5.0 { 100.0 } else { 10.0 })
            .collect();

        let mut tree = RegressionTree::new(TreeConfig::default());
        tree.fit(&features, &targets);

        assert!((tree.predict_one(&[2.0]) - 10.0).abs() < 1e-9);
        assert!((tree.predict_one(&[8.0]) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_targets_give_single_leaf() {
        let features = vec![vec![1.0], vec![2.0], vec![3.0]];
        let targets = vec![7.0, 7.0, 7.0];

        let mut tree = RegressionTree::new(TreeConfig::default());
        tree.fit(&features, &targets);

        assert_eq!(tree.predict_one(&[1.5]), 7.0);
        assert_eq!(tree.predict_one(&[99.0]), 7.0);
    }

    #[test]
    fn test_depth_bound_respected() {
        let features: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let targets: Vec<f64> = (0..64).map(|i| i as f64).collect();

        let mut tree = RegressionTree::new(TreeConfig {
            max_depth: 1,
            ..Default::default()
        });
        tree.fit(&features, &targets);

        // Depth 1 means at most one split: two distinct predictions
        let mut predictions: Vec<f64> = (0..64).map(|i| tree.predict_one(&[i as f64])).collect();
        predictions.sort_by(|a, b| a.partial_cmp(b).unwrap());
        predictions.dedup();
        assert!(predictions.len() <= 2);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let features: Vec<Vec<f64>> = (0..50)
            .map(|i| vec![i as f64, (i as f64 * 0.7).sin()])
            .collect();
        let targets: Vec<f64> = (0..50).map(|i| (i as f64).sqrt()).collect();

        let mut a = RegressionTree::new(TreeConfig { seed: 9, max_features: Some(1), ..Default::default() });
        let mut b = RegressionTree::new(TreeConfig { seed: 9, max_features: Some(1), ..Default::default() });
        a.fit(&features, &targets);
        b.fit(&features, &targets);

        for i in 0..50 {
            let row = [i as f64, (i as f64 * 0.7).sin()];
            assert_eq!(a.predict_one(&row), b.predict_one(&row));
        }
    }
}
