//! CSV import for transaction records
//!
//! Expected columns: `date,description,amount,category` with a header row.
//! Dates are `YYYY-MM-DD`; amounts are non-negative currency units.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::NewRecord;

/// Parse CSV data into records for a user
pub fn parse_csv<R: Read>(reader: R, user_id: i64) -> Result<Vec<NewRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let date_idx = column_index(&headers, "date")?;
    let description_idx = column_index(&headers, "description")?;
    let amount_idx = column_index(&headers, "amount")?;
    let category_idx = column_index(&headers, "category")?;

    let mut records = Vec::new();

    for (line, row) in csv_reader.records().enumerate() {
        let row = row?;
        // Line numbers for errors: header is line 1
        let line = line + 2;

        let date_str = field(&row, date_idx, "date", line)?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            Error::InvalidData(format!("line {}: bad date '{}': {}", line, date_str, e))
        })?;

        let amount_str = field(&row, amount_idx, "amount", line)?;
        let amount: f64 = amount_str.parse().map_err(|e| {
            Error::InvalidData(format!("line {}: bad amount '{}': {}", line, amount_str, e))
        })?;
        if amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "line {}: amount must be non-negative, got {}",
                line, amount
            )));
        }

        let description = field(&row, description_idx, "description", line)?.to_string();
        let category_name = field(&row, category_idx, "category", line)?.to_string();

        records.push(NewRecord {
            user_id,
            description,
            amount,
            date,
            category_name,
        });
    }

    debug!(count = records.len(), user_id, "Parsed CSV records");
    Ok(records)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::InvalidData(format!("missing '{}' column in CSV header", name)))
}

fn field<'a>(
    row: &'a csv::StringRecord,
    idx: usize,
    name: &str,
    line: usize,
) -> Result<&'a str> {
    row.get(idx)
        .ok_or_else(|| Error::InvalidData(format!("line {}: missing '{}' field", line, name)))
}
