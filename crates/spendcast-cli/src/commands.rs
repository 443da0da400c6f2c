//! Command implementations
//!
//! Each `cmd_*` function opens the database, drives the core library,
//! and prints a human-readable report.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use spendcast_core::{
    import, Database, ForecastEngine, InsightAnalyzer, Severity,
};

/// Open the database, creating it (and its schema) if missing
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    debug!(path = path_str, "Opening database");
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import transactions: spendcast import --file statement.csv");
    println!("  2. Train the model: spendcast train");
    println!("  3. Forecast: spendcast forecast --months 3");

    Ok(())
}

pub fn cmd_import(db_path: &Path, file: &Path, user: i64) -> Result<()> {
    println!("📥 Importing {} for user {}...", file.display(), user);

    let db = open_db(db_path)?;
    let reader = File::open(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let records = import::parse_csv(reader, user).context("Failed to parse CSV")?;
    let total = records.len();

    for record in &records {
        db.insert_record(record)
            .with_context(|| format!("Failed to insert record dated {}", record.date))?;
    }

    info!(count = total, user, "Import complete");
    println!("✅ Imported {} transactions", total);
    Ok(())
}

pub fn cmd_train(db_path: &Path, user: i64) -> Result<()> {
    println!("🧠 Training forecasting model for user {}...", user);

    let db = open_db(db_path)?;
    let engine = ForecastEngine::new(db.clone());

    let metrics = engine
        .train_and_publish(user, &db)
        .context("Training failed")?;

    println!();
    println!("📊 Training Metrics");
    println!("   ─────────────────────────────");
    println!("   MAE:  {:.2}", metrics.mae);
    println!("   MSE:  {:.2}", metrics.mse);
    println!("   RMSE: {:.2}", metrics.rmse);
    println!("   R²:   {:.3}", metrics.r2);
    println!(
        "   Samples: {} train / {} test",
        metrics.training_samples, metrics.test_samples
    );
    println!();
    println!("✅ Model trained and saved. Run 'spendcast forecast' to predict.");

    Ok(())
}

pub fn cmd_forecast(db_path: &Path, user: i64, months: u32, json: bool) -> Result<()> {
    let db = open_db(db_path)?;
    let engine = ForecastEngine::new(db.clone());

    let predictions = engine
        .predict(user, months, &db)
        .context("Forecast failed")?;
    debug!(user, months, count = predictions.len(), "Forecast generated");

    if json {
        println!("{}", serde_json::to_string_pretty(&predictions)?);
        return Ok(());
    }

    println!("🔮 Forecast for user {} ({} month(s))", user, months);

    if predictions.is_empty() {
        println!("   No predictions: no history found for the target months.");
        return Ok(());
    }

    println!();
    println!("📅 Predicted Monthly Spend");
    println!("   ─────────────────────────────");
    for p in &predictions {
        println!(
            "   {:<16} ₹{:>10.2}   confidence {:.0}%",
            p.month_name,
            p.predicted_amount,
            p.confidence * 100.0
        );
    }

    Ok(())
}

pub fn cmd_insights(db_path: &Path, user: i64, window: i64, json: bool) -> Result<()> {
    let db = open_db(db_path)?;
    let insights =
        InsightAnalyzer::analyze_recent(user, &db, window).context("Analysis failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("💡 Insights from the last {} days (user {})", window, user);

    if insights.is_empty() {
        println!("   Nothing noteworthy: spending looks steady.");
        return Ok(());
    }

    println!();
    for insight in &insights {
        let icon = match insight.severity {
            Severity::Warning => "⚠️ ",
            Severity::Success => "✅",
            Severity::Info => "ℹ️ ",
        };
        println!("{} {}", icon, insight.title);
        println!("   {}", insight.message);
    }

    Ok(())
}

pub fn cmd_status(db_path: &Path, user: i64) -> Result<()> {
    let db = open_db(db_path)?;
    let engine = ForecastEngine::new(db.clone());

    let status = engine.status(user, &db).context("Status check failed")?;

    println!("📊 Model Status (user {})", status.user_id);
    println!("   ─────────────────────────────");
    println!("   Records: {}", status.record_count);
    if let Some(trained_at) = status.trained_at {
        println!("   Trained: yes ({})", trained_at.format("%Y-%m-%d %H:%M UTC"));
    } else {
        println!("   Trained: no (run 'spendcast train')");
    }

    Ok(())
}
