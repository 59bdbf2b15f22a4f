//! finflow Core Library
//!
//! Shared functionality for the finflow transaction analytics tool:
//! - Rule-based category assignment at insert time
//! - Monthly net-savings history and a flat short-horizon forecast
//! - Seeded isolation-forest anomaly detection over amounts
//! - Summary orchestration over an explicitly passed transaction store
//! - Statement text parsing and a pluggable text extraction seam
//! - SQLite storage with connection pooling and optional encryption

pub mod analytics;
pub mod anomaly;
pub mod categorize;
pub mod config;
pub mod db;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod models;

pub use analytics::{summarize, AnalyticsService, TransactionStore};
pub use anomaly::{AnomalyConfig, AnomalyDetector};
pub use categorize::{assign_category, Categorizer, CategoryRule};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use forecast::Forecaster;
pub use ingest::{parse_statement_text, PlainTextExtractor, TextExtractor};
pub use models::{
    AnomalyRecord, CategoryTotal, ForecastResult, MonthlyAggregate, MonthlyTotal, NewTransaction,
    Summary, Transaction,
};
