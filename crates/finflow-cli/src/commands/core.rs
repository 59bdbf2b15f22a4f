//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Shared utility to load settings
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use finflow_core::{config::default_config_path, db::Database, Config};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Load settings from --config, the user config file, or built-in defaults
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::load(Some(path))
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(None).with_context(|| match default_config_path() {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Failed to load config".to_string(),
        })?,
    };
    debug!(
        currency = %config.ingest.default_currency,
        horizon = config.forecast.horizon_months,
        rules = config.categories.rules.len(),
        "Loaded config"
    );
    Ok(config)
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let count = db.count_transactions()?;
    println!("   Transactions stored: {}", count);

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import transactions: finflow import --file statement.txt");
    println!("  2. See where the money goes: finflow summary");
    println!("  3. Start the API: finflow serve");

    Ok(())
}
