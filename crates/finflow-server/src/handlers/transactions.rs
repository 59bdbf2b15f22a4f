//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use finflow_core::models::{NewTransaction, Transaction};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    MAX_PAGE_LIMIT
}

/// Submission body: a bare array or `{"transactions": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SubmitPayload {
    List(Vec<NewTransaction>),
    Wrapped { transactions: Vec<NewTransaction> },
}

impl SubmitPayload {
    pub fn into_items(self) -> Vec<NewTransaction> {
        match self {
            SubmitPayload::List(items) => items,
            SubmitPayload::Wrapped { transactions } => transactions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub inserted: usize,
}

/// GET /api/transactions - List stored transactions, oldest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let transactions = state.db.list_transactions(limit, offset)?;
    Ok(Json(transactions))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let tx = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found(&format!("Transaction {} not found", id)))?;
    Ok(Json(tx))
}

/// POST /api/transactions - Categorize and store reviewed transactions
///
/// The whole batch is rejected if any record is invalid.
pub async fn submit_transactions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitPayload>, JsonRejection>,
) -> Result<Json<SubmitResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::bad_request(&e.body_text()))?;
    let items = payload.into_items();

    let ids = state
        .db
        .insert_transactions(&state.categorizer, &items)
        .map_err(AppError::from_core)?;

    info!(inserted = ids.len(), "Stored submitted transactions");
    Ok(Json(SubmitResponse {
        inserted: ids.len(),
    }))
}
