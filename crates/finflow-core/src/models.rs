//! Domain models for finflow

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Currency recorded when an input omits one
pub const DEFAULT_CURRENCY: &str = "INR";

/// A persisted transaction
///
/// Rows are immutable once stored. `category` is assigned by the categorizer at
/// insert time and is never recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    /// Negative = expense/debit, positive = income/credit
    pub amount: f64,
    /// Informational only, never converted
    pub currency: String,
    pub description: String,
    pub category: String,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// A transaction to be inserted (before categorization and DB insertion)
///
/// Both the statement parser and the direct submission endpoint produce this type,
/// so there is exactly one place that decides what a valid input record looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

/// Accept `"description": null` the same as a missing description
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewTransaction {
    pub fn new(date: NaiveDate, amount: f64, description: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            currency: default_currency(),
            description: description.into(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Check and normalize the record
    ///
    /// The amount must be finite and the currency must be a 3-letter code
    /// (upper-cased on the way through). The description is trimmed.
    pub fn validate(&self) -> Result<NewTransaction> {
        if !self.amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "amount must be a finite number (got {})",
                self.amount
            )));
        }

        let currency = normalize_currency(&self.currency)?;

        Ok(NewTransaction {
            date: self.date,
            amount: self.amount,
            currency,
            description: self.description.trim().to_string(),
        })
    }
}

/// Upper-case and check an ISO-like 3-letter currency code
pub fn normalize_currency(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidData(format!(
            "currency must be a 3-letter code (got {:?})",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// A per-month value (net savings in history and forecast)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// "YYYY-MM"
    pub month: String,
    pub value: f64,
}

/// Savings history and flat projection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastResult {
    pub history: Vec<MonthlyAggregate>,
    pub forecast: Vec<MonthlyAggregate>,
}

/// Sum of amounts in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub amount: f64,
}

/// Sum of amounts for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Summary response: totals by month and category plus the savings forecast
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Chronological
    pub by_month: Vec<MonthlyTotal>,
    /// Descending by absolute total, ties by name
    pub by_category: Vec<CategoryTotal>,
    pub savings_forecast: ForecastResult,
}

/// A transaction flagged by the anomaly detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub description: String,
    pub category: String,
}

impl From<&Transaction> for AnomalyRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            date: tx.date,
            amount: tx.amount,
            description: tx.description.clone(),
            category: tx.category.clone(),
        }
    }
}

/// Format a date's calendar month as "YYYY-MM"
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
