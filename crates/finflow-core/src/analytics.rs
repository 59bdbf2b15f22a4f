//! Analytics orchestration
//!
//! `AnalyticsService` reads the full transaction set from an explicitly passed store
//! once per call and computes everything in memory. Storage errors are returned
//! unchanged; the analytics themselves cannot fail.

use std::collections::BTreeMap;
use std::collections::HashMap;

use tracing::info;

use crate::anomaly::AnomalyDetector;
use crate::error::Result;
use crate::forecast::Forecaster;
use crate::models::{month_key, AnomalyRecord, CategoryTotal, MonthlyTotal, Summary, Transaction};

/// The one storage capability analytics depends on
pub trait TransactionStore {
    fn fetch_all_transactions(&self) -> Result<Vec<Transaction>>;
}

/// In-memory store, useful for tests and one-off batches
impl TransactionStore for Vec<Transaction> {
    fn fetch_all_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.clone())
    }
}

/// Summary and anomaly computations over a transaction store
pub struct AnalyticsService<'a, S: TransactionStore + ?Sized> {
    store: &'a S,
    forecaster: Forecaster,
    detector: AnomalyDetector,
}

impl<'a, S: TransactionStore + ?Sized> AnalyticsService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            forecaster: Forecaster::default(),
            detector: AnomalyDetector::default(),
        }
    }

    pub fn with_forecaster(mut self, forecaster: Forecaster) -> Self {
        self.forecaster = forecaster;
        self
    }

    pub fn with_detector(mut self, detector: AnomalyDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Totals by month and category plus the savings forecast
    pub fn summary(&self) -> Result<Summary> {
        let transactions = self.store.fetch_all_transactions()?;
        let summary = summarize(&transactions, &self.forecaster);
        info!(
            transactions = transactions.len(),
            months = summary.by_month.len(),
            categories = summary.by_category.len(),
            "Built summary"
        );
        Ok(summary)
    }

    /// Transactions with unusual amounts, in storage order
    pub fn anomalies(&self) -> Result<Vec<AnomalyRecord>> {
        let transactions = self.store.fetch_all_transactions()?;
        let anomalies = self.detector.detect(&transactions);
        info!(
            transactions = transactions.len(),
            anomalies = anomalies.len(),
            contamination = self.detector.config().contamination,
            "Detected anomalies"
        );
        Ok(anomalies)
    }
}

/// Build a summary from an in-memory transaction set
///
/// An empty set still carries an (empty) savings forecast so the response shape
/// does not depend on the data.
pub fn summarize(transactions: &[Transaction], forecaster: &Forecaster) -> Summary {
    Summary {
        by_month: totals_by_month(transactions),
        by_category: totals_by_category(transactions),
        savings_forecast: forecaster.forecast(transactions),
    }
}

/// Sum of amounts per "YYYY-MM", chronological
pub fn totals_by_month(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(month_key(tx.date)).or_default() += tx.amount;
    }
    totals
        .into_iter()
        .map(|(month, amount)| MonthlyTotal { month, amount })
        .collect()
}

/// Sum of amounts per category, largest magnitude first (ties by name)
pub fn totals_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for tx in transactions {
        *totals.entry(tx.category.as_str()).or_default() += tx.amount;
    }

    let mut rows: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.amount
            .abs()
            .total_cmp(&a.amount.abs())
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}
