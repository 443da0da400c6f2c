//! Month-ahead prediction engine
//!
//! Keeps a per-user cache of published artifacts so predictions don't
//! reload from the store on every call. Retraining builds the new
//! artifact completely off to the side and publishes it in one swap, so
//! a concurrent prediction for the same user sees either the old model
//! or the new one, never a half-built state.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use super::artifact::ModelArtifact;
use super::features;
use super::store::ArtifactStore;
use super::trainer::ModelTrainer;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{MonthPrediction, TrainingMetrics, TransactionRecord};

/// Fixed epoch anchoring `days_since_start` for synthesized prediction
/// rows. Distinct from the training batch's own start date; see the
/// vocabulary notes on [`ModelArtifact`].
const FEATURE_EPOCH: (i32, u32, u32) = (2020, 1, 1);

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Read access to a user's transaction history, as the engine consumes
/// it. Implemented by [`Database`]; tests may substitute their own.
pub trait HistorySource {
    /// All records for a user, ordered by date ascending
    fn fetch_all(&self, user_id: i64) -> Result<Vec<TransactionRecord>>;

    /// Records on or after `since`, ordered by date ascending
    fn fetch_recent(&self, user_id: i64, since: NaiveDate) -> Result<Vec<TransactionRecord>>;

    /// Records in the given calendar month across the lookback window
    /// (two years back through one year ahead of `year`).
    fn fetch_for_month_across_years(
        &self,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<TransactionRecord>>;

    /// Total record count for a user
    fn count(&self, user_id: i64) -> Result<i64>;
}

impl HistorySource for Database {
    fn fetch_all(&self, user_id: i64) -> Result<Vec<TransactionRecord>> {
        self.fetch_all_for_user(user_id)
    }

    fn fetch_recent(&self, user_id: i64, since: NaiveDate) -> Result<Vec<TransactionRecord>> {
        Database::fetch_recent(self, user_id, since)
    }

    fn fetch_for_month_across_years(
        &self,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<TransactionRecord>> {
        Database::fetch_for_month_across_years(self, user_id, month, year)
    }

    fn count(&self, user_id: i64) -> Result<i64> {
        self.count_for_user(user_id)
    }
}

/// Training state reported for a user
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelStatus {
    pub user_id: i64,
    pub trained: bool,
    pub record_count: i64,
    pub trained_at: Option<DateTime<Utc>>,
}

/// Forecasting engine over an artifact store
pub struct ForecastEngine<S: ArtifactStore> {
    store: S,
    trainer: ModelTrainer,
    cache: RwLock<HashMap<i64, Arc<ModelArtifact>>>,
}

impl<S: ArtifactStore> ForecastEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            trainer: ModelTrainer::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Train a fresh model from the user's full history, persist it, and
    /// publish it to the cache. Returns the evaluation metrics.
    pub fn train_and_publish<H: HistorySource>(
        &self,
        user_id: i64,
        history: &H,
    ) -> Result<TrainingMetrics> {
        let records = history.fetch_all(user_id)?;
        let outcome = self.trainer.train(&records)?;

        self.store.save(user_id, &outcome.artifact)?;

        let artifact = Arc::new(outcome.artifact);
        self.cache_write().insert(user_id, artifact);

        info!(user_id, records = records.len(), "Published retrained model");
        Ok(outcome.metrics)
    }

    /// Predict the next `months_ahead` months (1..=12) from today
    pub fn predict<H: HistorySource>(
        &self,
        user_id: i64,
        months_ahead: u32,
        history: &H,
    ) -> Result<Vec<MonthPrediction>> {
        self.predict_as_of(user_id, months_ahead, history, Utc::now().date_naive())
    }

    /// Prediction relative to an explicit "today"
    pub fn predict_as_of<H: HistorySource>(
        &self,
        user_id: i64,
        months_ahead: u32,
        history: &H,
        today: NaiveDate,
    ) -> Result<Vec<MonthPrediction>> {
        if !(1..=12).contains(&months_ahead) {
            return Err(Error::InvalidData(format!(
                "months_ahead must be between 1 and 12, got {}",
                months_ahead
            )));
        }

        let artifact = self.resident_artifact(user_id)?;

        if history.count(user_id)? == 0 {
            return Err(Error::NoHistory(user_id));
        }

        let mut predictions = Vec::new();

        for offset in 1..=months_ahead {
            // Fixed 30-day month approximation, not calendar-accurate
            let target_date = today + Duration::days(30 * offset as i64);
            let target_month = target_date.month();
            let target_year = target_date.year();

            let month_history =
                history.fetch_for_month_across_years(user_id, target_month, target_year)?;
            if month_history.is_empty() {
                debug!(
                    user_id,
                    month = target_month,
                    year = target_year,
                    "No history for target month, skipping offset"
                );
                continue;
            }

            let row = synthesize_month_row(&month_history, &artifact, target_month, target_year)?;
            let predicted_amount = round2(artifact.predict_row(&row)?);
            let confidence = confidence_for(today, target_year, target_month);

            predictions.push(MonthPrediction {
                month: target_month,
                year: target_year,
                month_name: format!(
                    "{} {}",
                    MONTH_NAMES[target_month as usize - 1],
                    target_year
                ),
                predicted_amount,
                confidence,
            });
        }

        debug!(user_id, count = predictions.len(), "Generated month predictions");
        Ok(predictions)
    }

    /// Training state for a user: whether a model is available and when
    /// it was trained.
    pub fn status<H: HistorySource>(&self, user_id: i64, history: &H) -> Result<ModelStatus> {
        let record_count = history.count(user_id)?;

        // A cache miss here loads and publishes the artifact, the same
        // path predictions take, so the load isn't thrown away.
        let trained_at = match self.resident_artifact(user_id) {
            Ok(artifact) => Some(artifact.trained_at),
            Err(Error::ModelNotTrained(_)) => None,
            Err(err) => {
                warn!(user_id, error = %err, "Stored artifact unreadable");
                None
            }
        };

        Ok(ModelStatus {
            user_id,
            trained: trained_at.is_some(),
            record_count,
            trained_at,
        })
    }

    /// The artifact published for a user, loading lazily from the store
    /// on first use. [`Error::ModelNotTrained`] when neither the cache
    /// nor the store has one.
    fn resident_artifact(&self, user_id: i64) -> Result<Arc<ModelArtifact>> {
        if let Some(artifact) = self.cached(user_id) {
            return Ok(artifact);
        }

        let artifact = match self.store.load(user_id) {
            Ok(artifact) => Arc::new(artifact),
            Err(Error::ArtifactNotFound(_)) => return Err(Error::ModelNotTrained(user_id)),
            Err(err) => return Err(err),
        };

        self.cache_write().insert(user_id, Arc::clone(&artifact));
        Ok(artifact)
    }

    fn cached(&self, user_id: i64) -> Option<Arc<ModelArtifact>> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&user_id)
            .cloned()
    }

    fn cache_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<i64, Arc<ModelArtifact>>> {
        self.cache.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Build the mid-month stand-in feature row for a target month from that
/// month's history: most frequent category (encoded against the trained
/// vocabulary) and mean amount, anchored at day 15.
fn synthesize_month_row(
    month_history: &[TransactionRecord],
    artifact: &ModelArtifact,
    month: u32,
    year: i32,
) -> Result<Vec<f64>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for record in month_history {
        let count = counts.entry(record.category_name.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(record.category_name.as_str());
        }
        *count += 1;
    }

    // Ties go to the category seen first in date order
    let mut most_common: Option<(&str, usize)> = None;
    for &name in &first_seen {
        let count = counts[name];
        if most_common.map_or(true, |(_, best)| count > best) {
            most_common = Some((name, count));
        }
    }
    let most_common = most_common
        .map(|(name, _)| name)
        .ok_or_else(|| Error::InvalidData("empty month history".to_string()))?;
    let category_encoded = artifact.vocabulary.encode(most_common);

    let mean_amount =
        month_history.iter().map(|r| r.amount).sum::<f64>() / month_history.len() as f64;

    let anchor = NaiveDate::from_ymd_opt(year, month, 15)
        .ok_or_else(|| Error::InvalidData(format!("invalid target month {}-{}", year, month)))?;
    let (ey, em, ed) = FEATURE_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(ey, em, ed)
        .ok_or_else(|| Error::InvalidData("invalid feature epoch".to_string()))?;

    Ok(features::feature_values(anchor, epoch, category_encoded, mean_amount))
}

/// Confidence step function over the month-index distance between today
/// and the target month, floored at 0.5. Month indices span year
/// boundaries, so December to January is distance 1, not 11.
fn confidence_for(today: NaiveDate, target_year: i32, target_month: u32) -> f64 {
    let today_index = today.year() * 12 + today.month() as i32;
    let target_index = target_year * 12 + target_month as i32;
    let distance = (target_index - today_index).unsigned_abs();

    let confidence = match distance {
        0 => 0.9,
        1 => 0.8,
        2 => 0.7,
        d => (0.9 - 0.1 * d as f64).max(0.5),
    };
    round2(confidence)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
