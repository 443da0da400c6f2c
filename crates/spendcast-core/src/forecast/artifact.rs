//! The trained model artifact
//!
//! Owns the fitted forest, the fitted scaler, the frozen feature column
//! schema, and the category vocabulary the features were encoded against.
//! Created whole by training, persisted as one blob, swapped atomically
//! on retrain, never partially updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::features::{CategoryVocabulary, FEATURE_COLUMNS};
use super::forest::RandomForest;
use super::scaler::StandardScaler;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    forest: RandomForest,
    scaler: StandardScaler,
    /// Frozen column schema the forest was trained against
    pub feature_columns: Vec<String>,
    /// Category encoding frozen at training time
    pub vocabulary: CategoryVocabulary,
    pub trained_at: DateTime<Utc>,
}

impl ModelArtifact {
    pub fn new(
        forest: RandomForest,
        scaler: StandardScaler,
        vocabulary: CategoryVocabulary,
    ) -> Self {
        Self {
            forest,
            scaler,
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vocabulary,
            trained_at: Utc::now(),
        }
    }

    /// Scale a raw feature row, run the forest, clamp to non-negative.
    ///
    /// The row must match the frozen column schema.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.feature_columns.len() {
            return Err(Error::SchemaMismatch(format!(
                "expected {} feature columns, got {}",
                self.feature_columns.len(),
                row.len()
            )));
        }

        let scaled = self.scaler.transform(row);
        Ok(self.forest.predict_one(&scaled).max(0.0))
    }

    /// Serialize for the artifact store
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Restore from the artifact store, verifying the frozen schema still
    /// matches the columns this build produces.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;

        if artifact.feature_columns != FEATURE_COLUMNS {
            return Err(Error::SchemaMismatch(format!(
                "stored artifact has columns {:?}, expected {:?}",
                artifact.feature_columns, FEATURE_COLUMNS
            )));
        }

        Ok(artifact)
    }
}
