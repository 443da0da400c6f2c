//! Data models for Spendcast
//!
//! `TransactionRecord` is the immutable fact the engine reads; everything
//! else here is derived output (predictions, metrics, insights).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stored transaction record, owned by the persistence layer.
///
/// The forecasting engine only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    /// Spend amount in currency units, never negative.
    pub amount: f64,
    pub date: NaiveDate,
    pub category_name: String,
}

/// A record about to be inserted (no id yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub user_id: i64,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_name: String,
}

/// One calendar day's summed spend, used as the regression target series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_amount: f64,
}

/// Evaluation metrics from one training run (not persisted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Mean absolute error on the held-out split.
    pub mae: f64,
    /// Mean squared error on the held-out split.
    pub mse: f64,
    /// Root mean squared error (sqrt of mse).
    pub rmse: f64,
    /// Coefficient of determination. May be negative on poor fits.
    pub r2: f64,
    pub training_samples: usize,
    pub test_samples: usize,
}

/// A month-ahead spend prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthPrediction {
    /// Calendar month 1-12.
    pub month: u32,
    pub year: i32,
    /// Human-readable label, e.g. "March 2026".
    pub month_name: String,
    /// Predicted spend, clamped to be non-negative, rounded to 2 decimals.
    pub predicted_amount: f64,
    /// Heuristic trust score in [0, 1], decaying with forecast horizon.
    pub confidence: f64,
}

/// Kind of rule that produced a spending insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Month-over-month spending trend
    Trend,
    /// Spend concentrated in one category
    Category,
    /// Monthly spend above the budget threshold
    Budget,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Trend => "trend",
            InsightKind::Category => "category",
            InsightKind::Budget => "budget",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trend" => Ok(InsightKind::Trend),
            "category" => Ok(InsightKind::Category),
            "budget" => Ok(InsightKind::Budget),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// Severity of a spending insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth acting on
    Warning,
    /// Positive development
    Success,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Success => "success",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "success" => Ok(Severity::Success),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A rule-derived observation about recent spending behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl SpendingInsight {
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            severity,
        }
    }
}
