//! Savings forecast
//!
//! Net savings per calendar month is income minus the magnitude of expenses. The
//! forecast is deliberately naive: the unweighted mean of all historical months,
//! repeated for each month of the horizon starting the month after the last one
//! seen. Months without transactions are absent from history, not zero-filled.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use crate::models::{month_key, ForecastResult, MonthlyAggregate, Transaction};

/// Default number of months projected
pub const DEFAULT_HORIZON_MONTHS: u32 = 3;

/// Income and expense sums for one month
#[derive(Debug, Default, Clone, Copy)]
struct MonthFlows {
    income: f64,
    expense: f64,
}

impl MonthFlows {
    fn savings(&self) -> f64 {
        self.income - self.expense.abs()
    }
}

/// Flat mean-based savings forecaster
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    horizon_months: u32,
}

impl Forecaster {
    pub fn new() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }

    pub fn with_horizon(horizon_months: u32) -> Self {
        Self { horizon_months }
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    /// Net savings per month, in chronological order
    pub fn monthly_savings(&self, transactions: &[Transaction]) -> Vec<MonthlyAggregate> {
        group_flows(transactions)
            .into_iter()
            .map(|(month, flows)| MonthlyAggregate {
                month: month_key(month),
                value: flows.savings(),
            })
            .collect()
    }

    /// Savings history plus a flat projection over the horizon
    pub fn forecast(&self, transactions: &[Transaction]) -> ForecastResult {
        let history = self.monthly_savings(transactions);

        let Some(last_month) = transactions.iter().map(|tx| month_start(tx.date)).max() else {
            return ForecastResult::default();
        };

        let mean_savings = history.iter().map(|m| m.value).sum::<f64>() / history.len() as f64;
        let value = round_cents(mean_savings);

        let forecast = (1..=self.horizon_months)
            .filter_map(|offset| last_month.checked_add_months(Months::new(offset)))
            .map(|month| MonthlyAggregate {
                month: month_key(month),
                value,
            })
            .collect();

        debug!(
            months = history.len(),
            mean_savings,
            horizon = self.horizon_months,
            "Computed savings forecast"
        );

        ForecastResult { history, forecast }
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}

/// First day of the transaction's month
fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Income/expense sums keyed by first-of-month, ordered chronologically
fn group_flows(transactions: &[Transaction]) -> BTreeMap<NaiveDate, MonthFlows> {
    let mut flows: BTreeMap<NaiveDate, MonthFlows> = BTreeMap::new();
    for tx in transactions {
        let entry = flows.entry(month_start(tx.date)).or_default();
        if tx.amount > 0.0 {
            entry.income += tx.amount;
        } else {
            entry.expense += tx.amount;
        }
    }
    flows
}

/// Round to 2 decimal places, half away from zero
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
