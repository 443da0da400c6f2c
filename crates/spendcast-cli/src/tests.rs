//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use spendcast_core::{Database, NewRecord};

use crate::commands;

fn temp_db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("test.db")
}

/// Insert a daily record for each of the last `days` days
fn seed_daily_history(db: &Database, user: i64, days: i64) {
    let today = Utc::now().date_naive();
    for i in 0..days {
        db.insert_record(&NewRecord {
            user_id: user,
            description: format!("purchase {}", i),
            amount: 100.0 + (i % 5) as f64 * 20.0,
            date: today - Duration::days(i),
            category_name: if i % 2 == 0 { "Food" } else { "Transport" }.to_string(),
        })
        .unwrap();
    }
}

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    // Re-running init on an existing database is fine
    commands::cmd_init(&path).unwrap();
}

#[test]
fn test_cmd_import_loads_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let csv_path = dir.path().join("statement.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "date,description,amount,category").unwrap();
    writeln!(file, "2025-06-01,groceries,450.50,Food").unwrap();
    writeln!(file, "2025-06-02,bus pass,120.00,Transport").unwrap();
    drop(file);

    commands::cmd_import(&path, &csv_path, 1).unwrap();

    let db = commands::open_db(&path).unwrap();
    assert_eq!(db.count_for_user(1).unwrap(), 2);
}

#[test]
fn test_cmd_import_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let result = commands::cmd_import(&path, &dir.path().join("nope.csv"), 1);
    assert!(result.is_err());
}

#[test]
fn test_cmd_train_then_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let db = commands::open_db(&path).unwrap();
    seed_daily_history(&db, 1, 30);

    commands::cmd_train(&path, 1).unwrap();
    commands::cmd_status(&path, 1).unwrap();
}

#[test]
fn test_cmd_train_fails_without_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let result = commands::cmd_train(&path, 1);
    assert!(result.is_err());
}

#[test]
fn test_cmd_forecast_requires_training() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let db = commands::open_db(&path).unwrap();
    seed_daily_history(&db, 1, 30);

    let result = commands::cmd_forecast(&path, 1, 1, false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_forecast_after_training() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let db = commands::open_db(&path).unwrap();
    // A year of history so every target month has data
    seed_daily_history(&db, 1, 365);

    commands::cmd_train(&path, 1).unwrap();
    commands::cmd_forecast(&path, 1, 3, false).unwrap();
}

#[test]
fn test_cmd_insights_over_recent_window() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let db = commands::open_db(&path).unwrap();
    seed_daily_history(&db, 1, 60);

    commands::cmd_insights(&path, 1, 90, true).unwrap();
}

#[test]
fn test_cmd_insights_fails_with_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_db_path(&dir);
    commands::cmd_init(&path).unwrap();

    let result = commands::cmd_insights(&path, 1, 90, false);
    assert!(result.is_err());
}
