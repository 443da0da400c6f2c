//! Transaction record operations

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{NewRecord, TransactionRecord};

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, i64, String, f64, String, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn build_record(
    (id, user_id, date, amount, description, category_name): (i64, i64, String, f64, String, String),
) -> Result<TransactionRecord> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|e| Error::InvalidData(format!("bad date '{}' in records table: {}", date, e)))?;
    Ok(TransactionRecord {
        id,
        user_id,
        description,
        amount,
        date,
        category_name,
    })
}

const SELECT_COLUMNS: &str = "id, user_id, date, amount, description, category_name";

impl Database {
    /// Insert a transaction record, returning its id
    pub fn insert_record(&self, record: &NewRecord) -> Result<i64> {
        if record.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "record amount must be non-negative, got {}",
                record.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO records (user_id, date, description, amount, category_name)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                record.user_id,
                record.date.to_string(),
                record.description,
                record.amount,
                record.category_name,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// All records for a user, ordered by date ascending
    pub fn fetch_all_for_user(&self, user_id: i64) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM records WHERE user_id = ? ORDER BY date ASC, id ASC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![user_id], row_to_record)?;
        rows.map(|r| build_record(r?)).collect()
    }

    /// Records for a user dated on or after `since`, ordered by date ascending
    pub fn fetch_recent(&self, user_id: i64, since: NaiveDate) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM records WHERE user_id = ? AND date >= ? ORDER BY date ASC, id ASC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![user_id, since.to_string()], row_to_record)?;
        rows.map(|r| build_record(r?)).collect()
    }

    /// Records for a user falling in calendar month `month`, across the
    /// lookback window from two years before `year` through the year after
    /// (the range the prediction loop uses to estimate typical behavior
    /// for that month).
    pub fn fetch_for_month_across_years(
        &self,
        user_id: i64,
        month: u32,
        year: i32,
    ) -> Result<Vec<TransactionRecord>> {
        let window_start = format!("{:04}-{:02}-01", year - 2, month);
        let window_end = format!("{:04}-{:02}-01", year + 1, month);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM records
            WHERE user_id = ?
              AND date >= ? AND date < ?
              AND CAST(strftime('%m', date) AS INTEGER) = ?
            ORDER BY date ASC, id ASC
            "#,
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(
            params![user_id, window_start, window_end, month],
            row_to_record,
        )?;
        rows.map(|r| build_record(r?)).collect()
    }

    /// Number of records stored for a user
    pub fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: i64, date: &str, amount: f64, category: &str) -> NewRecord {
        NewRecord {
            user_id,
            description: format!("{} purchase", category),
            amount,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category_name: category.to_string(),
        }
    }

    #[test]
    fn test_insert_and_fetch_all() {
        let db = Database::in_memory().unwrap();

        db.insert_record(&record(1, "2025-03-10", 120.0, "Food")).unwrap();
        db.insert_record(&record(1, "2025-01-05", 80.0, "Transport")).unwrap();
        db.insert_record(&record(2, "2025-02-01", 50.0, "Food")).unwrap();

        let records = db.fetch_all_for_user(1).unwrap();
        assert_eq!(records.len(), 2);
        // Ordered ascending by date
        assert_eq!(records[0].category_name, "Transport");
        assert_eq!(records[1].amount, 120.0);

        assert_eq!(db.count_for_user(1).unwrap(), 2);
        assert_eq!(db.count_for_user(3).unwrap(), 0);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let db = Database::in_memory().unwrap();
        let result = db.insert_record(&record(1, "2025-01-01", -5.0, "Food"));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_fetch_recent_filters_by_date() {
        let db = Database::in_memory().unwrap();
        db.insert_record(&record(1, "2025-01-01", 10.0, "Food")).unwrap();
        db.insert_record(&record(1, "2025-06-15", 20.0, "Food")).unwrap();

        let since = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let recent = db.fetch_recent(1, since).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].amount, 20.0);
    }

    #[test]
    fn test_fetch_for_month_across_years() {
        let db = Database::in_memory().unwrap();
        // Same calendar month, three different years
        db.insert_record(&record(1, "2023-06-10", 10.0, "Food")).unwrap();
        db.insert_record(&record(1, "2024-06-20", 20.0, "Food")).unwrap();
        db.insert_record(&record(1, "2025-06-05", 30.0, "Food")).unwrap();
        // Different month, should be excluded
        db.insert_record(&record(1, "2025-05-05", 99.0, "Food")).unwrap();
        // Outside the lookback window
        db.insert_record(&record(1, "2020-06-01", 99.0, "Food")).unwrap();

        let hits = db.fetch_for_month_across_years(1, 6, 2025).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|r| r.date.format("%m").to_string() == "06"));
    }
}
