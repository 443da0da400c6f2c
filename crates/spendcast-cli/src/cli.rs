//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendcast - Forecast your spending from transaction history
#[derive(Parser)]
#[command(name = "spendcast")]
#[command(about = "Expense forecasting and spending insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendcast.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from CSV
    Import {
        /// CSV file to import (columns: date, description, amount, category)
        #[arg(short, long)]
        file: PathBuf,

        /// User the records belong to
        #[arg(short, long, default_value = "1")]
        user: i64,
    },

    /// Train the forecasting model from a user's history
    Train {
        /// User to train for
        #[arg(short, long, default_value = "1")]
        user: i64,
    },

    /// Predict spending for upcoming months
    Forecast {
        /// User to forecast for
        #[arg(short, long, default_value = "1")]
        user: i64,

        /// Months ahead to predict (1-12)
        #[arg(short, long, default_value = "3")]
        months: u32,

        /// Print predictions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze recent spending for insights
    Insights {
        /// User to analyze
        #[arg(short, long, default_value = "1")]
        user: i64,

        /// Analysis window in days
        #[arg(short, long, default_value = "90")]
        window: i64,

        /// Print insights as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show model training status
    Status {
        /// User to report on
        #[arg(short, long, default_value = "1")]
        user: i64,
    },
}
