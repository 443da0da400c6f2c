//! Feature pipeline: raw records to numeric feature rows
//!
//! Every row carries the same seven columns in the same order
//! ([`FEATURE_COLUMNS`]). The schema is frozen into the trained artifact,
//! and prediction-time vectors are checked against it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{DailyTotal, TransactionRecord};

/// The frozen feature column schema. Order and count must match between
/// training and prediction.
pub const FEATURE_COLUMNS: [&str; 7] = [
    "month",
    "day_of_month",
    "day_of_week",
    "is_weekend",
    "days_since_start",
    "category_encoded",
    "amount_log",
];

/// Category name -> integer encoding, in first-seen order.
///
/// Built once at training time and frozen into the artifact so prediction
/// reuses the same mapping. Categories not seen at training time map to a
/// reserved unknown index past the known range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocabulary {
    names: Vec<String>,
}

impl CategoryVocabulary {
    /// Build the vocabulary from a record batch, first-seen order
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            if !names.iter().any(|n| n == &record.category_name) {
                names.push(record.category_name.clone());
            }
        }
        Self { names }
    }

    /// Encoded index for a category; unknown categories get the reserved
    /// index one past the known range.
    pub fn encode(&self, category: &str) -> usize {
        self.names
            .iter()
            .position(|n| n == category)
            .unwrap_or(self.names.len())
    }

    /// The reserved index for categories unseen at build time
    pub fn unknown_index(&self) -> usize {
        self.names.len()
    }

    /// Number of known categories
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Known category names in encoding order
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One record's feature values, keyed by its date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    /// Values in [`FEATURE_COLUMNS`] order
    pub values: Vec<f64>,
}

/// The output of one feature build: per-record rows plus the batch-local
/// context (vocabulary, batch start date) they were derived against.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub rows: Vec<FeatureRow>,
    pub vocabulary: CategoryVocabulary,
    /// Earliest record date in the batch; `days_since_start` is relative
    /// to this, so it is re-derived on every build.
    pub start_date: NaiveDate,
}

/// Converts raw transaction records into numeric feature rows and daily
/// aggregates.
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Build one feature row per record.
    ///
    /// Fails on empty input: a feature set is never synthesized from
    /// nothing.
    pub fn build(records: &[TransactionRecord]) -> Result<FeatureSet> {
        let start_date = records
            .iter()
            .map(|r| r.date)
            .min()
            .ok_or_else(|| Error::InsufficientData {
                reason: "empty_input",
                message: "cannot build features from an empty record set".to_string(),
            })?;

        let vocabulary = CategoryVocabulary::from_records(records);

        let rows = records
            .iter()
            .map(|record| {
                let values = feature_values(
                    record.date,
                    start_date,
                    vocabulary.encode(&record.category_name),
                    record.amount,
                );
                FeatureRow {
                    date: record.date,
                    values,
                }
            })
            .collect();

        Ok(FeatureSet {
            rows,
            vocabulary,
            start_date,
        })
    }

    /// Per-calendar-day summed spend, sorted ascending by date.
    ///
    /// Days with no transactions are absent, not zero-filled.
    pub fn daily_totals(records: &[TransactionRecord]) -> Vec<DailyTotal> {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            *totals.entry(record.date).or_insert(0.0) += record.amount;
        }

        totals
            .into_iter()
            .map(|(date, total_amount)| DailyTotal { date, total_amount })
            .collect()
    }
}

/// Derive the seven feature values for a single (date, category, amount)
/// observation. `amount` is log1p-transformed; non-finite results are
/// zero-filled.
pub(crate) fn feature_values(
    date: NaiveDate,
    start_date: NaiveDate,
    category_encoded: usize,
    amount: f64,
) -> Vec<f64> {
    // Monday=0 .. Sunday=6, weekend is Saturday/Sunday
    let day_of_week = date.weekday().num_days_from_monday();
    let is_weekend = if day_of_week >= 5 { 1.0 } else { 0.0 };

    let values = vec![
        date.month() as f64,
        date.day() as f64,
        day_of_week as f64,
        is_weekend,
        (date - start_date).num_days() as f64,
        category_encoded as f64,
        amount.ln_1p(),
    ];

    values
        .into_iter()
        .map(|v| if v.is_finite() { v } else { 0.0 })
        .collect()
}
