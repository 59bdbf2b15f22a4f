//! finflow CLI - Personal transaction analytics
//!
//! Usage:
//!   finflow init                      Initialize database
//!   finflow import --file sms.txt     Import statement lines
//!   finflow summary                   Totals and savings forecast
//!   finflow anomalies                 Unusual transactions
//!   finflow serve --port 3000         Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
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

    let settings = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Import { file, dry_run } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, &settings, &file, dry_run)
        }
        Commands::Add {
            date,
            amount,
            description,
            currency,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_add(
                &db,
                &settings,
                date,
                amount,
                &description,
                currency.as_deref(),
            )
        }
        Commands::Transactions { limit, offset } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_transactions_list(&db, limit, offset)
        }
        Commands::Summary { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_summary(&db, &settings, json)
        }
        Commands::Anomalies { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_anomalies(&db, &settings, json)
        }
        Commands::Categorize {
            description,
            amount,
        } => commands::cmd_categorize(&settings, &description, amount),
        Commands::Serve {
            port,
            host,
            allow_origins,
        } => {
            commands::cmd_serve(
                &cli.db,
                &settings,
                &host,
                port,
                allow_origins,
                cli.no_encrypt,
            )
            .await
        }
    }
}
