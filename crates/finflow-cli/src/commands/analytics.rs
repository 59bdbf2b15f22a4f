//! Summary and anomaly report commands

use anyhow::{Context, Result};
use finflow_core::{db::Database, AnalyticsService, Config};

use super::truncate;

fn service<'a>(db: &'a Database, settings: &Config) -> AnalyticsService<'a, Database> {
    AnalyticsService::new(db)
        .with_forecaster(settings.forecaster())
        .with_detector(settings.detector())
}

pub fn cmd_summary(db: &Database, settings: &Config, json: bool) -> Result<()> {
    let summary = service(db, settings)
        .summary()
        .context("Failed to build summary")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.by_month.is_empty() {
        println!("No transactions yet. Import some with:");
        println!("  finflow import --file statement.txt");
        return Ok(());
    }

    println!();
    println!("📅 By Month");
    println!("   ─────────────────────────────");
    for row in &summary.by_month {
        println!("   {} │ {:>14.2}", row.month, row.amount);
    }

    println!();
    println!("🏷️  By Category");
    println!("   ─────────────────────────────");
    for row in &summary.by_category {
        println!("   {:<12} │ {:>14.2}", row.category, row.amount);
    }

    println!();
    println!("💰 Savings");
    println!("   ─────────────────────────────");
    for point in &summary.savings_forecast.history {
        println!("   {} │ {:>14.2}", point.month, point.value);
    }
    for point in &summary.savings_forecast.forecast {
        println!("   {} │ {:>14.2}  (forecast)", point.month, point.value);
    }

    Ok(())
}

pub fn cmd_anomalies(db: &Database, settings: &Config, json: bool) -> Result<()> {
    let anomalies = service(db, settings)
        .anomalies()
        .context("Failed to detect anomalies")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "anomalies": anomalies }))?
        );
        return Ok(());
    }

    if anomalies.is_empty() {
        println!("✅ No unusual transactions found.");
        return Ok(());
    }

    println!();
    println!("⚠️  Unusual Transactions ({})", anomalies.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for a in &anomalies {
        println!(
            "   [{}] {} │ {:>14.2} │ {:<10} │ {}",
            a.id,
            a.date,
            a.amount,
            a.category,
            truncate(&a.description, 35)
        );
    }

    Ok(())
}
