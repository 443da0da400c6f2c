//! Expense forecasting engine
//!
//! Pipeline: records -> [`FeatureBuilder`] -> [`ModelTrainer`] producing a
//! persisted [`ModelArtifact`]; records + artifact -> [`ForecastEngine`]
//! -> month predictions; records alone -> [`InsightAnalyzer`] -> insights.

mod artifact;
mod engine;
mod features;
mod forest;
mod insights;
mod metrics;
mod scaler;
mod store;
mod trainer;
mod tree;

pub use artifact::ModelArtifact;
pub use engine::{ForecastEngine, HistorySource, ModelStatus};
pub use features::{CategoryVocabulary, FeatureBuilder, FeatureRow, FeatureSet, FEATURE_COLUMNS};
pub use forest::{ForestConfig, RandomForest};
pub use insights::{InsightAnalyzer, DEFAULT_WINDOW_DAYS};
pub use scaler::StandardScaler;
pub use store::ArtifactStore;
pub use trainer::{ModelTrainer, TrainingOutcome, MIN_JOINED_ROWS, MIN_TRAINING_RECORDS};
