//! Spendcast CLI - Expense forecasting from transaction history
//!
//! Usage:
//!   spendcast init                      Initialize database
//!   spendcast import --file CSV --user 1  Import transactions
//!   spendcast train --user 1            Train the forecasting model
//!   spendcast forecast --user 1         Predict upcoming months
//!   spendcast insights --user 1         Analyze recent spending
//!   spendcast status --user 1           Show model status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file, user } => commands::cmd_import(&cli.db, &file, user),
        Commands::Train { user } => commands::cmd_train(&cli.db, user),
        Commands::Forecast { user, months, json } => {
            commands::cmd_forecast(&cli.db, user, months, json)
        }
        Commands::Insights { user, window, json } => {
            commands::cmd_insights(&cli.db, user, window, json)
        }
        Commands::Status { user } => commands::cmd_status(&cli.db, user),
    }
}
