//! Transaction command implementations

use anyhow::Result;
use finflow_core::{db::Database, Config};

use super::{format_amount, truncate};

pub fn cmd_transactions_list(db: &Database, limit: i64, offset: i64) -> Result<()> {
    let transactions = db.list_transactions(limit.max(1), offset.max(0))?;

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  finflow import --file statement.txt");
        return Ok(());
    }

    let total = db.count_transactions()?;

    println!();
    println!("📝 Transactions ({} of {})", transactions.len(), total);
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        println!(
            "   [{}] {} │ {:>18} │ {:<10} │ {}",
            tx.id,
            tx.date,
            format_amount(tx.amount, &tx.currency),
            tx.category,
            truncate(&tx.description, 35)
        );
    }

    Ok(())
}

/// Show the category the configured rules would assign
pub fn cmd_categorize(settings: &Config, description: &str, amount: f64) -> Result<()> {
    let categorizer = settings.categorizer()?;
    let category = categorizer.assign(description, amount);

    let rule = categorizer
        .rules()
        .iter()
        .find(|r| r.pattern.is_match(&description.to_lowercase()));

    println!("🏷️  {}", category);
    match rule {
        Some(rule) => println!("   Matched rule: /{}/", rule.pattern),
        None => println!("   No rule matched, fallback by sign of amount"),
    }
    Ok(())
}
