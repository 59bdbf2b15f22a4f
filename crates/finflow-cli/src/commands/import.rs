//! Import command implementations

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use finflow_core::{
    db::Database, ingest::parse_statement_text_with_currency, models::NewTransaction, Config,
    PlainTextExtractor, TextExtractor,
};
use tracing::info;

use super::{format_amount, truncate};

/// Parse a statement file and store its transactions
///
/// With `dry_run`, rows are parsed and categorized for display but nothing is stored.
pub fn cmd_import(db: &Database, settings: &Config, file: &Path, dry_run: bool) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file.file_name().and_then(|n| n.to_str());
    let text = PlainTextExtractor
        .extract_text(&bytes, filename)
        .context("Failed to extract statement text")?;

    let parsed = parse_statement_text_with_currency(&text, &settings.ingest.default_currency);
    if parsed.is_empty() {
        println!("   No transaction lines found.");
        println!("   Expected lines like: 2024-08-01, UPI to XYZ, -230.50");
        return Ok(());
    }

    let categorizer = settings.categorizer()?;

    if dry_run {
        println!("   Dry run: {} transactions parsed, nothing stored", parsed.len());
        println!("   ─────────────────────────────────────────────────────────────");
        for tx in &parsed {
            println!(
                "   {} │ {:>18} │ {:<12} │ {}",
                tx.date,
                format_amount(tx.amount, &tx.currency),
                categorizer.assign(&tx.description, tx.amount),
                truncate(&tx.description, 35)
            );
        }
        return Ok(());
    }

    let ids = db
        .insert_transactions(&categorizer, &parsed)
        .context("Failed to store transactions")?;
    info!(file = %file.display(), imported = ids.len(), "Imported statement");

    println!("✅ Imported {} transactions", ids.len());
    Ok(())
}

/// Add one transaction
pub fn cmd_add(
    db: &Database,
    settings: &Config,
    date: NaiveDate,
    amount: f64,
    description: &str,
    currency: Option<&str>,
) -> Result<()> {
    let currency = currency.unwrap_or(&settings.ingest.default_currency);
    let item = NewTransaction::new(date, amount, description).with_currency(currency);

    let categorizer = settings.categorizer()?;
    let id = db
        .insert_transaction(&categorizer, &item)
        .context("Failed to add transaction")?;

    let stored = db
        .get_transaction(id)?
        .context("Transaction disappeared after insert")?;
    println!(
        "✅ Added #{} {} {} → {}",
        stored.id,
        stored.date,
        format_amount(stored.amount, &stored.currency),
        stored.category
    );
    Ok(())
}
