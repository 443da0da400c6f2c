//! Error types for Spendcast

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Insufficient data ({reason}): {message}")]
    InsufficientData { reason: &'static str, message: String },

    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Model not trained for user {0}")]
    ModelNotTrained(i64),

    #[error("No historical records for user {0}")]
    NoHistory(i64),

    #[error("Artifact not found for user {0}")]
    ArtifactNotFound(i64),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Failure with the `insufficient_history` reason (fewer than the
    /// minimum number of records to train).
    pub fn insufficient_history(n: usize, min: usize) -> Self {
        Error::InsufficientData {
            reason: "insufficient_history",
            message: format!("need at least {} records to train, have {}", min, n),
        }
    }

    /// Failure with the `insufficient_after_join` reason (too few rows
    /// survived the feature/target date join).
    pub fn insufficient_after_join(n: usize, min: usize) -> Self {
        Error::InsufficientData {
            reason: "insufficient_after_join",
            message: format!("need at least {} joined rows, have {}", min, n),
        }
    }

    /// Failure with the `no_recent_data` reason (empty insight window).
    pub fn no_recent_data() -> Self {
        Error::InsufficientData {
            reason: "no_recent_data",
            message: "no records in the analysis window".to_string(),
        }
    }

    /// Stable machine-readable reason code for this failure, for callers
    /// mapping engine errors to API responses.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InsufficientData { reason, .. } => reason,
            Error::SchemaMismatch(_) => "schema_mismatch",
            Error::ModelNotTrained(_) => "model_not_trained",
            Error::NoHistory(_) => "no_history",
            Error::ArtifactNotFound(_) => "artifact_not_found",
            Error::Persistence(_) => "persistence",
            Error::InvalidData(_) => "invalid_data",
            Error::Database(_) | Error::Pool(_) => "database",
            Error::Csv(_) => "csv",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(Error::insufficient_history(3, 10).reason(), "insufficient_history");
        assert_eq!(Error::insufficient_after_join(2, 5).reason(), "insufficient_after_join");
        assert_eq!(Error::no_recent_data().reason(), "no_recent_data");
        assert_eq!(Error::ModelNotTrained(1).reason(), "model_not_trained");
        assert_eq!(Error::NoHistory(1).reason(), "no_history");
    }
}
