//! Model training protocol
//!
//! Builds feature rows and the daily aggregate series, pairs each day's
//! features with the next present day's total as the regression target,
//! fits the scaler and forest on a seeded 80/20 split, and evaluates on
//! the held-out portion.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::{debug, info};

use super::artifact::ModelArtifact;
use super::features::FeatureBuilder;
use super::forest::{ForestConfig, RandomForest};
use super::metrics;
use super::scaler::StandardScaler;
use crate::error::{Error, Result};
use crate::models::{TrainingMetrics, TransactionRecord};

/// Minimum records before training is attempted
pub const MIN_TRAINING_RECORDS: usize = 10;

/// Minimum feature rows that must survive the target join
pub const MIN_JOINED_ROWS: usize = 5;

const TEST_RATIO: f64 = 0.2;
const SPLIT_SEED: u64 = 42;

/// A successful training run: evaluation metrics plus the artifact ready
/// to persist and publish.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub metrics: TrainingMetrics,
    pub artifact: ModelArtifact,
}

/// Fits the forecasting model from historical records
pub struct ModelTrainer {
    config: ForestConfig,
}

impl Default for ModelTrainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelTrainer {
    pub fn new() -> Self {
        Self {
            config: ForestConfig::default(),
        }
    }

    pub fn with_config(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Train on a user's records. No side effects; persisting the artifact
    /// is the caller's job.
    pub fn train(&self, records: &[TransactionRecord]) -> Result<TrainingOutcome> {
        if records.len() < MIN_TRAINING_RECORDS {
            return Err(Error::insufficient_history(records.len(), MIN_TRAINING_RECORDS));
        }

        let feature_set = FeatureBuilder::build(records)?;
        let daily = FeatureBuilder::daily_totals(records);

        // Target for day d: total spend on the next day present in the
        // series. Calendar gaps are skipped, not zero-filled; the last
        // day has no target and is dropped.
        let mut target_by_date: HashMap<NaiveDate, f64> = HashMap::new();
        for window in daily.windows(2) {
            target_by_date.insert(window[0].date, window[1].total_amount);
        }

        let mut features: Vec<Vec<f64>> = Vec::new();
        let mut targets: Vec<f64> = Vec::new();
        for row in &feature_set.rows {
            if let Some(&target) = target_by_date.get(&row.date) {
                features.push(row.values.clone());
                targets.push(target);
            }
        }

        if features.len() < MIN_JOINED_ROWS {
            return Err(Error::insufficient_after_join(features.len(), MIN_JOINED_ROWS));
        }

        // Seeded shuffle split for reproducible runs
        let n = features.len();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(SPLIT_SEED);
        indices.shuffle(&mut rng);

        let test_size = ((n as f64 * TEST_RATIO).ceil() as usize).clamp(1, n - 1);
        let (test_indices, train_indices) = indices.split_at(test_size);

        let train_features: Vec<Vec<f64>> =
            train_indices.iter().map(|&i| features[i].clone()).collect();
        let train_targets: Vec<f64> = train_indices.iter().map(|&i| targets[i]).collect();
        let test_features: Vec<Vec<f64>> =
            test_indices.iter().map(|&i| features[i].clone()).collect();
        let test_targets: Vec<f64> = test_indices.iter().map(|&i| targets[i]).collect();

        debug!(
            total = n,
            train = train_features.len(),
            test = test_features.len(),
            "Training split prepared"
        );

        // Scaler statistics come from the training split only
        let scaler = StandardScaler::fit(&train_features);
        let train_scaled = scaler.transform_all(&train_features);
        let test_scaled = scaler.transform_all(&test_features);

        let mut forest = RandomForest::new(self.config);
        forest.fit(&train_scaled, &train_targets);

        let predictions = forest.predict(&test_scaled);
        let metrics = metrics::evaluate(&test_targets, &predictions, train_scaled.len());

        info!(
            records = records.len(),
            mae = metrics.mae,
            rmse = metrics.rmse,
            r2 = metrics.r2,
            "Model training complete"
        );

        let artifact = ModelArtifact::new(forest, scaler, feature_set.vocabulary);

        Ok(TrainingOutcome { metrics, artifact })
    }
}
