//! Spendcast Core Library
//!
//! Shared functionality for the Spendcast expense forecasting tool:
//! - Database access and migrations for transaction records
//! - CSV record import
//! - Feature pipeline over dated transaction records
//! - Seeded random-forest training with held-out evaluation
//! - Month-ahead spend prediction with confidence scoring
//! - Rule-based spending insights
//! - Per-user model artifact persistence

pub mod db;
pub mod error;
pub mod forecast;
pub mod import;
pub mod models;

pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{
    ArtifactStore, CategoryVocabulary, FeatureBuilder, FeatureSet, ForecastEngine, HistorySource,
    InsightAnalyzer, ModelArtifact, ModelStatus, ModelTrainer, StandardScaler, TrainingOutcome,
    FEATURE_COLUMNS,
};
pub use models::{
    DailyTotal, InsightKind, MonthPrediction, NewRecord, Severity, SpendingInsight,
    TrainingMetrics, TransactionRecord,
};
