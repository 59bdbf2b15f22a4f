//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// finflow - Categorize, summarize and forecast your transactions
#[derive(Parser)]
#[command(name = "finflow")]
#[command(about = "Personal transaction analytics: categories, savings forecast, anomalies", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "finflow.db", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to ~/.config/finflow/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set FINFLOW_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from a text statement (SMS export, copied statement lines)
    Import {
        /// Statement file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Show what would be imported without storing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Add a single transaction
    Add {
        /// Transaction date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Signed amount (negative = expense)
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// Description used for categorization
        #[arg(short, long, default_value = "")]
        description: String,

        /// 3-letter currency code (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,
    },

    /// List stored transactions, oldest first
    Transactions {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Number of transactions to skip
        #[arg(long, default_value = "0")]
        offset: i64,
    },

    /// Show totals by month and category plus the savings forecast
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show transactions with unusual amounts
    Anomalies {
        /// Print anomalies as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which category a description would get
    Categorize {
        /// Transaction description
        description: String,

        /// Signed amount (decides the fallback category)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        amount: f64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable, "*" for any)
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },
}
