//! Rule-based spending insights
//!
//! Pure analysis of a recent-history window; no trained model involved.
//! Each rule is evaluated independently and emits at most one insight.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use super::engine::HistorySource;
use crate::error::{Error, Result};
use crate::models::{InsightKind, Severity, SpendingInsight, TransactionRecord};

/// Default analysis window, in days of history
pub const DEFAULT_WINDOW_DAYS: i64 = 90;

/// Monthly spend above this triggers the budget insight
const BUDGET_THRESHOLD: f64 = 50_000.0;

/// A single category above this share of window spend triggers the
/// concentration insight.
const CONCENTRATION_THRESHOLD_PERCENT: f64 = 40.0;

/// Month-over-month increase above this is a warning instead of info
const TREND_WARNING_PERCENT: f64 = 20.0;

pub struct InsightAnalyzer;

impl InsightAnalyzer {
    /// Evaluate all rules over a window of records.
    ///
    /// Returns an empty vector when no rule fires; fails only on empty
    /// input.
    pub fn analyze(records: &[TransactionRecord]) -> Result<Vec<SpendingInsight>> {
        if records.is_empty() {
            return Err(Error::no_recent_data());
        }

        let monthly = monthly_totals(records);

        let mut insights = Vec::new();
        if let Some(insight) = trend_insight(&monthly) {
            insights.push(insight);
        }
        if let Some(insight) = concentration_insight(records) {
            insights.push(insight);
        }
        if let Some(insight) = budget_insight(&monthly) {
            insights.push(insight);
        }

        debug!(records = records.len(), insights = insights.len(), "Insight analysis complete");
        Ok(insights)
    }

    /// Fetch the trailing window for a user and analyze it
    pub fn analyze_recent<H: HistorySource>(
        user_id: i64,
        history: &H,
        window_days: i64,
    ) -> Result<Vec<SpendingInsight>> {
        Self::analyze_recent_as_of(user_id, history, window_days, Utc::now().date_naive())
    }

    /// Window analysis relative to an explicit "today"
    pub fn analyze_recent_as_of<H: HistorySource>(
        user_id: i64,
        history: &H,
        window_days: i64,
        today: NaiveDate,
    ) -> Result<Vec<SpendingInsight>> {
        let since = today - Duration::days(window_days);
        let records = history.fetch_recent(user_id, since)?;
        Self::analyze(&records)
    }
}

/// Spend summed per calendar month, ordered by (year, month)
fn monthly_totals(records: &[TransactionRecord]) -> BTreeMap<(i32, u32), f64> {
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for record in records {
        *totals
            .entry((record.date.year(), record.date.month()))
            .or_insert(0.0) += record.amount;
    }
    totals
}

/// Compare the two most recent months' totals
fn trend_insight(monthly: &BTreeMap<(i32, u32), f64>) -> Option<SpendingInsight> {
    if monthly.len() < 2 {
        return None;
    }

    let mut recent = monthly.values().rev();
    let latest = *recent.next()?;
    let previous = *recent.next()?;

    let change = latest - previous;
    // Guard the percentage against an empty previous month
    let change_percent = if previous > 0.0 {
        (change / previous) * 100.0
    } else {
        0.0
    };

    if change > 0.0 {
        let severity = if change_percent > TREND_WARNING_PERCENT {
            Severity::Warning
        } else {
            Severity::Info
        };
        Some(SpendingInsight::new(
            InsightKind::Trend,
            "Spending Increase",
            format!(
                "Your spending increased by ₹{:.0} ({:.1}%) compared to last month",
                change.abs(),
                change_percent.abs()
            ),
            severity,
        ))
    } else {
        Some(SpendingInsight::new(
            InsightKind::Trend,
            "Spending Decrease",
            format!(
                "Great job! Your spending decreased by ₹{:.0} ({:.1}%) compared to last month",
                change.abs(),
                change_percent.abs()
            ),
            Severity::Success,
        ))
    }
}

/// Flag the top category if it dominates the window's spend
fn concentration_insight(records: &[TransactionRecord]) -> Option<SpendingInsight> {
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total = 0.0;
    for record in records {
        *by_category.entry(record.category_name.as_str()).or_insert(0.0) += record.amount;
        total += record.amount;
    }

    if total <= 0.0 {
        return None;
    }

    let (top_category, top_amount) = by_category
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))?;
    let top_percentage = (top_amount / total) * 100.0;

    if top_percentage > CONCENTRATION_THRESHOLD_PERCENT {
        Some(SpendingInsight::new(
            InsightKind::Category,
            "High Category Concentration",
            format!(
                "{} accounts for {:.1}% of your spending. Consider diversifying expenses.",
                top_category, top_percentage
            ),
            Severity::Warning,
        ))
    } else {
        None
    }
}

/// Flag a high mean monthly total over the window
fn budget_insight(monthly: &BTreeMap<(i32, u32), f64>) -> Option<SpendingInsight> {
    if monthly.is_empty() {
        return None;
    }

    let avg_monthly = monthly.values().sum::<f64>() / monthly.len() as f64;
    if avg_monthly > BUDGET_THRESHOLD {
        Some(SpendingInsight::new(
            InsightKind::Budget,
            "High Monthly Spending",
            format!(
                "Your average monthly spending is ₹{:.0}. Consider setting a budget to control expenses.",
                avg_monthly
            ),
            Severity::Warning,
        ))
    } else {
        None
    }
}
