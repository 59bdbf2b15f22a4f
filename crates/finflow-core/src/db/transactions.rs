//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::Database;
use crate::analytics::TransactionStore;
use crate::categorize::Categorizer;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction};

const SELECT_COLUMNS: &str =
    "SELECT id, date, amount, currency, description, category FROM transactions";

impl Database {
    /// Validate, categorize and insert a batch of transactions
    ///
    /// The batch is all-or-nothing: if any record is invalid nothing is written.
    /// Returns the new row ids in input order.
    pub fn insert_transactions(
        &self,
        categorizer: &Categorizer,
        items: &[NewTransaction],
    ) -> Result<Vec<i64>> {
        let validated = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.validate()
                    .map_err(|e| Error::InvalidData(format!("transaction {}: {}", i, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(validated.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transactions (date, description, amount, currency, category) VALUES (?, ?, ?, ?, ?)",
            )?;
            for item in &validated {
                let category = categorizer.assign(&item.description, item.amount);
                stmt.execute(params![
                    item.date.to_string(),
                    item.description,
                    item.amount,
                    item.currency,
                    category,
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;

        info!(inserted = ids.len(), "Inserted transactions");
        Ok(ids)
    }

    /// Insert a single transaction, returning its id
    pub fn insert_transaction(
        &self,
        categorizer: &Categorizer,
        item: &NewTransaction,
    ) -> Result<i64> {
        let ids = self.insert_transactions(categorizer, std::slice::from_ref(item))?;
        ids.into_iter()
            .next()
            .ok_or_else(|| Error::InvalidData("insert returned no id".to_string()))
    }

    /// List transactions ordered by date then id
    pub fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY date ASC, id ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![limit, offset], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Get a transaction by id
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Every stored transaction, ordered by date then id
    pub fn all_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY date ASC, id ASC", SELECT_COLUMNS))?;
        let transactions = stmt
            .query_map([], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(1)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Transaction {
            id: row.get(0)?,
            date,
            amount: row.get(2)?,
            currency: row.get(3)?,
            description: row.get(4)?,
            category: row.get(5)?,
        })
    }
}

impl TransactionStore for Database {
    fn fetch_all_transactions(&self) -> Result<Vec<Transaction>> {
        self.all_transactions()
    }
}
