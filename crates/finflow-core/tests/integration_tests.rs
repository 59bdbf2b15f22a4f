//! Integration tests for finflow-core
//!
//! These tests exercise the full parse → insert → summary/anomalies workflow.

use finflow_core::{
    config::Config, db::Database, ingest::parse_statement_text_with_currency,
    parse_statement_text, AnalyticsService, Categorizer, TransactionStore,
};

/// Three months of a salaried account with one very large purchase
fn statement_text() -> String {
    let mut text = String::from("ACME BANK - ACCOUNT STATEMENT\n");
    for month in 1..=3 {
        text.push_str(&format!("2024-{:02}-01, Salary credit, 50000\n", month));
        text.push_str(&format!("2024-{:02}-03, Rent for flat, -15000\n", month));
        for day in 5..=25 {
            text.push_str(&format!(
                "2024-{:02}-{:02}, Swiggy order, -{}.50\n",
                month,
                day,
                200 + day * 3
            ));
        }
    }
    text.push_str("2024-02-14, Amazon shopping, -250000\n");
    text.push_str("End of statement\n");
    text
}

#[test]
fn test_full_import_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let categorizer = Categorizer::default();

    let parsed = parse_statement_text(&statement_text());
    assert_eq!(parsed.len(), 3 * 23 + 1);

    let ids = db
        .insert_transactions(&categorizer, &parsed)
        .expect("Failed to insert");
    assert_eq!(ids.len(), parsed.len());

    let stored = db.fetch_all_transactions().unwrap();
    assert_eq!(stored.len(), parsed.len());
    assert!(stored.windows(2).all(|w| w[0].date <= w[1].date));

    let service = AnalyticsService::new(&db);
    let summary = service.summary().unwrap();

    let months: Vec<&str> = summary.by_month.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);

    // Every category total sums back to the grand total
    let grand: f64 = stored.iter().map(|t| t.amount).sum();
    let by_category: f64 = summary.by_category.iter().map(|c| c.amount).sum();
    assert!((grand - by_category).abs() < 1e-6);

    // Shopping has the largest magnitude because of the outlier
    assert_eq!(summary.by_category[0].category, "Shopping");

    assert_eq!(summary.savings_forecast.history.len(), 3);
    let forecast_months: Vec<&str> = summary
        .savings_forecast
        .forecast
        .iter()
        .map(|m| m.month.as_str())
        .collect();
    assert_eq!(forecast_months, vec!["2024-04", "2024-05", "2024-06"]);

    let anomalies = service.anomalies().unwrap();
    assert!(anomalies.iter().any(|a| a.amount == -250000.0));
    assert!(anomalies.len() <= stored.len() / 10);
}

#[test]
fn test_categories_assigned_at_insert() {
    let db = Database::in_memory().unwrap();
    let parsed = parse_statement_text(&statement_text());
    db.insert_transactions(&Categorizer::default(), &parsed)
        .unwrap();

    let stored = db.fetch_all_transactions().unwrap();
    let category_of = |description: &str| {
        stored
            .iter()
            .find(|t| t.description == description)
            .map(|t| t.category.clone())
            .unwrap()
    };

    assert_eq!(category_of("Salary credit"), "Income");
    assert_eq!(category_of("Rent for flat"), "Housing");
    assert_eq!(category_of("Swiggy order"), "Food");
    assert_eq!(category_of("Amazon shopping"), "Shopping");
}

#[test]
fn test_analytics_are_repeatable() {
    let db = Database::in_memory().unwrap();
    db.insert_transactions(
        &Categorizer::default(),
        &parse_statement_text(&statement_text()),
    )
    .unwrap();

    let service = AnalyticsService::new(&db);
    assert_eq!(service.summary().unwrap(), service.summary().unwrap());
    assert_eq!(service.anomalies().unwrap(), service.anomalies().unwrap());
}

#[test]
fn test_config_drives_components() {
    let config = Config::parse(
        r#"
        [ingest]
        default_currency = "EUR"

        [forecast]
        horizon_months = 1

        [[categories.rules]]
        pattern = "swiggy"
        category = "Eating out"
        "#,
    )
    .unwrap();

    let db = Database::in_memory().unwrap();
    let parsed = parse_statement_text_with_currency(
        "2024-05-01, Swiggy order, -300\n2024-05-02, Salary, 1000",
        &config.ingest.default_currency,
    );
    db.insert_transactions(&config.categorizer().unwrap(), &parsed)
        .unwrap();

    let stored = db.fetch_all_transactions().unwrap();
    assert_eq!(stored[0].category, "Eating out");
    assert_eq!(stored[0].currency, "EUR");
    // Custom rules replace the built-in table, so the salary falls back by sign
    assert_eq!(stored[1].category, "Income");

    let summary = AnalyticsService::new(&db)
        .with_forecaster(config.forecaster())
        .with_detector(config.detector())
        .summary()
        .unwrap();
    assert_eq!(summary.savings_forecast.forecast.len(), 1);
    assert_eq!(summary.savings_forecast.forecast[0].value, 700.0);
}

#[test]
fn test_empty_database_analytics() {
    let db = Database::in_memory().unwrap();
    let service = AnalyticsService::new(&db);

    let summary = service.summary().unwrap();
    assert!(summary.by_month.is_empty());
    assert!(summary.savings_forecast.forecast.is_empty());
    assert!(service.anomalies().unwrap().is_empty());
}
