//! Model artifact blob storage
//!
//! One serialized artifact per user, overwritten wholesale on each
//! successful retrain. The typed [`ArtifactStore`](crate::forecast::ArtifactStore)
//! implementation on top of these blobs lives in the forecast module.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;

impl Database {
    /// Store an artifact blob for a user, replacing any previous one
    pub fn save_artifact_blob(
        &self,
        user_id: i64,
        data: &[u8],
        trained_at: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO model_artifacts (user_id, data, trained_at, updated_at)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP)
            "#,
            params![user_id, data, trained_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load the artifact blob for a user, if one has been saved
    pub fn load_artifact_blob(&self, user_id: i64) -> Result<Option<Vec<u8>>> {
        let conn = self.conn()?;
        let blob = conn
            .query_row(
                "SELECT data FROM model_artifacts WHERE user_id = ?",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(blob)
    }

    /// Whether a persisted artifact exists for a user
    pub fn artifact_exists(&self, user_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM model_artifacts WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_round_trip_and_overwrite() {
        let db = Database::in_memory().unwrap();

        assert!(!db.artifact_exists(7).unwrap());
        assert!(db.load_artifact_blob(7).unwrap().is_none());

        db.save_artifact_blob(7, b"first", Utc::now()).unwrap();
        assert!(db.artifact_exists(7).unwrap());
        assert_eq!(db.load_artifact_blob(7).unwrap().unwrap(), b"first");

        // Retrain replaces the blob wholesale
        db.save_artifact_blob(7, b"second", Utc::now()).unwrap();
        assert_eq!(db.load_artifact_blob(7).unwrap().unwrap(), b"second");

        // Other users unaffected
        assert!(!db.artifact_exists(8).unwrap());
    }
}
