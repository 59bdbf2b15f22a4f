//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use chrono::NaiveDate;
use clap::Parser;
use finflow_core::db::Database;
use finflow_core::Config;

use crate::cli::{Cli, Commands};
use crate::commands::{self, format_amount, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn statement_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ========== Import Command Tests ==========

#[test]
fn test_cmd_import_stores_rows() {
    let db = setup_test_db();
    let file = statement_file(
        "2024-08-01, UPI to XYZ, -230.50\n2024-08-03 Salary August, 85000\n2024-08-05, Swiggy order, -320.4\n",
    );

    commands::cmd_import(&db, &Config::default(), file.path(), false).unwrap();

    let stored = db.list_transactions(10, 0).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].category, "Transfers");
    assert_eq!(stored[1].category, "Income");
    assert_eq!(stored[2].category, "Food");
}

#[test]
fn test_cmd_import_dry_run_stores_nothing() {
    let db = setup_test_db();
    let file = statement_file("2024-08-01, UPI to XYZ, -230.50\n");

    commands::cmd_import(&db, &Config::default(), file.path(), true).unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_cmd_import_no_matches() {
    let db = setup_test_db();
    let file = statement_file("nothing to see here\n");

    commands::cmd_import(&db, &Config::default(), file.path(), false).unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_cmd_import_missing_file() {
    let db = setup_test_db();
    let dir = tempfile::tempdir().unwrap();
    let result = commands::cmd_import(
        &db,
        &Config::default(),
        &dir.path().join("missing.txt"),
        false,
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_import_rejects_pdf() {
    let db = setup_test_db();
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-1.4").unwrap();

    let result = commands::cmd_import(&db, &Config::default(), file.path(), false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_import_uses_config() {
    let db = setup_test_db();
    let settings = Config::parse(
        r#"
        [ingest]
        default_currency = "USD"

        [[categories.rules]]
        pattern = "swiggy"
        category = "Eating out"
        "#,
    )
    .unwrap();
    let file = statement_file("2024-08-05, Swiggy order, -320.4\n");

    commands::cmd_import(&db, &settings, file.path(), false).unwrap();

    let stored = db.list_transactions(10, 0).unwrap();
    assert_eq!(stored[0].category, "Eating out");
    assert_eq!(stored[0].currency, "USD");
}

// ========== Add Command Tests ==========

#[test]
fn test_cmd_add() {
    let db = setup_test_db();
    commands::cmd_add(
        &db,
        &Config::default(),
        date("2024-08-01"),
        -450.0,
        "Uber trip",
        None,
    )
    .unwrap();

    let stored = db.list_transactions(10, 0).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].category, "Transport");
    assert_eq!(stored[0].currency, "INR");
}

#[test]
fn test_cmd_add_explicit_currency() {
    let db = setup_test_db();
    commands::cmd_add(
        &db,
        &Config::default(),
        date("2024-08-01"),
        12.0,
        "",
        Some("eur"),
    )
    .unwrap();

    let stored = db.list_transactions(10, 0).unwrap();
    assert_eq!(stored[0].currency, "EUR");
    assert_eq!(stored[0].category, "Income");
}

#[test]
fn test_cmd_add_invalid_currency() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        &Config::default(),
        date("2024-08-01"),
        -1.0,
        "x",
        Some("RUPEES"),
    );
    assert!(result.is_err());
    assert_eq!(db.count_transactions().unwrap(), 0);
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_transactions_list() {
    let db = setup_test_db();
    assert!(commands::cmd_transactions_list(&db, 20, 0).is_ok());

    commands::cmd_add(&db, &Config::default(), date("2024-01-01"), -5.0, "Cafe", None).unwrap();
    assert!(commands::cmd_transactions_list(&db, 20, 0).is_ok());
}

#[test]
fn test_cmd_summary_and_anomalies() {
    let db = setup_test_db();
    let settings = Config::default();

    // Empty database
    assert!(commands::cmd_summary(&db, &settings, false).is_ok());
    assert!(commands::cmd_anomalies(&db, &settings, false).is_ok());

    let file = statement_file(
        "2024-12-02, Salary, 800\n2024-12-09, Swiggy, -300\n2024-12-10, Amazon, -50000\n",
    );
    commands::cmd_import(&db, &settings, file.path(), false).unwrap();

    assert!(commands::cmd_summary(&db, &settings, false).is_ok());
    assert!(commands::cmd_summary(&db, &settings, true).is_ok());
    assert!(commands::cmd_anomalies(&db, &settings, false).is_ok());
    assert!(commands::cmd_anomalies(&db, &settings, true).is_ok());
}

#[test]
fn test_cmd_categorize() {
    let settings = Config::default();
    assert!(commands::cmd_categorize(&settings, "Uber food refund", 120.0).is_ok());
    assert!(commands::cmd_categorize(&settings, "", -10.0).is_ok());
}

#[test]
fn test_cmd_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init.db");

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());

    let db = commands::open_db(&path, true).unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[forecast]\nhorizon_months = 6").unwrap();

    let settings = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(settings.forecast.horizon_months, 6);

    let dir = tempfile::tempdir().unwrap();
    assert!(commands::load_config(Some(&dir.path().join("missing.toml"))).is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer description", 10), "a longe...");
    // Multi-byte characters are not split
    assert_eq!(truncate("₹₹₹₹₹₹₹₹", 5), "₹₹...");
}

#[test]
fn test_format_amount() {
    assert!(format_amount(-230.5, "INR").contains("-230.50 INR"));
    assert!(format_amount(85000.0, "INR").contains("+85000.00 INR"));
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_add_negative_amount() {
    let cli = Cli::try_parse_from([
        "finflow",
        "--no-encrypt",
        "add",
        "--date",
        "2024-08-01",
        "--amount",
        "-230.5",
        "--description",
        "UPI to XYZ",
    ])
    .unwrap();

    assert!(cli.no_encrypt);
    match cli.command {
        Commands::Add {
            date: d,
            amount,
            description,
            currency,
        } => {
            assert_eq!(d, date("2024-08-01"));
            assert_eq!(amount, -230.5);
            assert_eq!(description, "UPI to XYZ");
            assert!(currency.is_none());
        }
        _ => panic!("expected add command"),
    }
}

#[test]
fn test_parse_serve_origins() {
    let cli = Cli::try_parse_from([
        "finflow",
        "serve",
        "--allow-origin",
        "http://localhost:5173",
        "--allow-origin",
        "*",
    ])
    .unwrap();

    match cli.command {
        Commands::Serve {
            port,
            host,
            allow_origins,
        } => {
            assert_eq!(port, 3000);
            assert_eq!(host, "127.0.0.1");
            assert_eq!(allow_origins, vec!["http://localhost:5173", "*"]);
        }
        _ => panic!("expected serve command"),
    }
}

#[test]
fn test_parse_rejects_bad_date() {
    let result = Cli::try_parse_from(["finflow", "add", "--date", "2024-13-01", "--amount", "1"]);
    assert!(result.is_err());
}
