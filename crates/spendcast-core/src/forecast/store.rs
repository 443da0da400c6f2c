//! Typed artifact persistence
//!
//! The engine talks to storage through [`ArtifactStore`] so it can run
//! against the SQLite database in production and an in-memory map in
//! tests.

use tracing::debug;

use super::artifact::ModelArtifact;
use crate::db::Database;
use crate::error::{Error, Result};

/// Persistence seam for trained model artifacts. One artifact per user,
/// replaced wholesale on retrain.
pub trait ArtifactStore: Send + Sync {
    /// Persist an artifact for a user, replacing any previous one
    fn save(&self, user_id: i64, artifact: &ModelArtifact) -> Result<()>;

    /// Load the artifact for a user; [`Error::ArtifactNotFound`] if none
    /// has been saved.
    fn load(&self, user_id: i64) -> Result<ModelArtifact>;

    /// Whether a persisted artifact exists for a user
    fn exists(&self, user_id: i64) -> Result<bool>;
}

impl ArtifactStore for Database {
    fn save(&self, user_id: i64, artifact: &ModelArtifact) -> Result<()> {
        let bytes = artifact.to_bytes()?;
        debug!(user_id, size = bytes.len(), "Saving model artifact");
        self.save_artifact_blob(user_id, &bytes, artifact.trained_at)
    }

    fn load(&self, user_id: i64) -> Result<ModelArtifact> {
        let bytes = self
            .load_artifact_blob(user_id)?
            .ok_or(Error::ArtifactNotFound(user_id))?;
        ModelArtifact::from_bytes(&bytes)
    }

    fn exists(&self, user_id: i64) -> Result<bool> {
        self.artifact_exists(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::features::CategoryVocabulary;
    use crate::forecast::forest::{ForestConfig, RandomForest};
    use crate::forecast::scaler::StandardScaler;
    use crate::models::TransactionRecord;
    use chrono::NaiveDate;

    fn small_artifact() -> ModelArtifact {
        let features: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![(i % 12 + 1) as f64, (i % 28 + 1) as f64, (i % 7) as f64, 0.0, i as f64, 0.0, 4.0])
            .collect();
        let targets: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();

        let scaler = StandardScaler::fit(&features);
        let scaled = scaler.transform_all(&features);
        let mut forest = RandomForest::new(ForestConfig { n_trees: 5, ..Default::default() });
        forest.fit(&scaled, &targets);

        let records = vec![TransactionRecord {
            id: 1,
            user_id: 1,
            description: "lunch".into(),
            amount: 120.0,
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            category_name: "Food".into(),
        }];
        ModelArtifact::new(forest, scaler, CategoryVocabulary::from_records(&records))
    }

    #[test]
    fn test_load_missing_is_artifact_not_found() {
        let db = Database::in_memory().unwrap();
        let err = ArtifactStore::load(&db, 42).unwrap_err();
        assert_eq!(err.reason(), "artifact_not_found");
    }

    #[test]
    fn test_save_load_round_trip() {
        let db = Database::in_memory().unwrap();
        let artifact = small_artifact();

        ArtifactStore::save(&db, 1, &artifact).unwrap();
        assert!(ArtifactStore::exists(&db, 1).unwrap());

        let restored = ArtifactStore::load(&db, 1).unwrap();
        let row = vec![6.0, 15.0, 2.0, 0.0, 10.0, 0.0, 4.0];
        assert_eq!(
            artifact.predict_row(&row).unwrap(),
            restored.predict_row(&row).unwrap()
        );
        assert_eq!(restored.vocabulary.names(), artifact.vocabulary.names());
    }

    #[test]
    fn test_retrain_overwrites() {
        let db = Database::in_memory().unwrap();
        let first = small_artifact();
        let second = small_artifact();

        ArtifactStore::save(&db, 1, &first).unwrap();
        ArtifactStore::save(&db, 1, &second).unwrap();

        let restored = ArtifactStore::load(&db, 1).unwrap();
        assert_eq!(restored.trained_at, second.trained_at);
    }
}
